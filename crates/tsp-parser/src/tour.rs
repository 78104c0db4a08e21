//! Parsing and writing of standalone TSPLIB tour files.
//!
//! A tour file consists of a `TOUR_SECTION` listing one 1-based node index per line, terminated
//! by `-1`, followed by `EOF`.

use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TourParseError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("tour file is missing a TOUR_SECTION")]
    MissingTourSection,
    #[error("invalid node index in tour file: {0}")]
    InvalidNodeIndex(String),
}

/// Parses a tour file at `path`, returning the tour as a sequence of 0-based node indices.
pub fn parse_tour_file<P: AsRef<Path>>(path: P) -> Result<Vec<usize>, TourParseError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut nodes = Vec::new();
    let mut found_section = false;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with("NAME") || line.starts_with("TYPE")
            || line.starts_with("DIMENSION") || line.starts_with("COMMENT")
        {
            continue;
        }

        if line == "TOUR_SECTION" {
            found_section = true;
            continue;
        }

        if !found_section {
            continue;
        }

        if line == "-1" || line == "EOF" {
            break;
        }

        let index: i64 = line
            .parse()
            .map_err(|_| TourParseError::InvalidNodeIndex(line.to_string()))?;
        nodes.push((index - 1) as usize);
    }

    if !found_section {
        return Err(TourParseError::MissingTourSection);
    }

    Ok(nodes)
}

/// Writes `tour` (0-based node indices) to `path` in TSPLIB tour format.
pub fn write_tour_file<P: AsRef<Path>>(
    path: P,
    name: &str,
    tour: &[usize],
) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "NAME: {name}")?;
    writeln!(file, "TYPE: TOUR")?;
    writeln!(file, "DIMENSION: {}", tour.len())?;
    writeln!(file, "TOUR_SECTION")?;
    for &node in tour {
        writeln!(file, "{}", node + 1)?;
    }
    writeln!(file, "-1")?;
    writeln!(file, "EOF")?;
    Ok(())
}
