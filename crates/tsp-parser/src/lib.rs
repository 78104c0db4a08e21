use memmap2::{Advice, Mmap};
use std::{fs::File, path::Path};
use thiserror::Error;
use tsp_core::instance::{InstanceMetadata, TSPSymInstance, distance::Distance, matrix::Matrix, matrix::MatrixSym};

use crate::{
    data_section::parse_data_sections,
    metadata::{MetaDataParseError, parse_metadata},
};

pub mod data_section;
pub mod distance_container;
pub mod metadata;
pub mod tour;

/// Raw, mmap-backed file bytes. The TSP instance file is expected to be valid UTF-8, but we
/// index into it as bytes to avoid re-validating on every line.
pub(crate) type FileContent = [u8];

#[derive(Error, Debug)]
pub enum ParserError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    MetaDataParsing(#[from] MetaDataParseError),
}

/// Parses a symmetric TSP instance (NODE_COORD_SECTION, or a symmetric EDGE_WEIGHT_FORMAT).
pub fn parse_tsp_instance<P: AsRef<Path>>(instance_path: P) -> Result<TSPSymInstance, ParserError> {
    let mmap = map_file(instance_path)?;
    let mut index_in_map = 0;

    let (metadata, data_keyword) = parse_metadata(&mmap, &mut index_in_map)?;
    log::debug!(
        "parsed metadata for '{}': dimension {}, edge_weight_type {:?}",
        metadata.name,
        metadata.dimension,
        metadata.edge_weight_type
    );
    let distances: MatrixSym<Distance> =
        parse_data_sections(&mmap, &mut index_in_map, data_keyword, &metadata);

    Ok(TSPSymInstance::new_from_distances_sym(distances, metadata))
}

/// Parses an asymmetric TSP instance, i.e. `EDGE_WEIGHT_TYPE=EXPLICIT`,
/// `EDGE_WEIGHT_FORMAT=FULL_MATRIX`.
///
/// Returns the dense (non-symmetric) distance matrix alongside the parsed metadata, since
/// [TSPSymInstance] cannot represent an asymmetric instance.
pub fn parse_atsp_instance<P: AsRef<Path>>(
    instance_path: P,
) -> Result<(InstanceMetadata, Matrix<Distance>), ParserError> {
    let mmap = map_file(instance_path)?;
    let mut index_in_map = 0;

    let (metadata, data_keyword) = parse_metadata(&mmap, &mut index_in_map)?;
    let distances: Matrix<Distance> =
        parse_data_sections(&mmap, &mut index_in_map, data_keyword, &metadata);

    Ok((metadata, distances))
}

fn map_file<P: AsRef<Path>>(instance_path: P) -> Result<Mmap, ParserError> {
    // Safety: This is the only point at which we access the file, so the file should not be
    // modified otherwise.
    let mmap = unsafe { Mmap::map(&File::open(instance_path)?)? };
    mmap.advise(Advice::Sequential)?;
    Ok(mmap)
}
