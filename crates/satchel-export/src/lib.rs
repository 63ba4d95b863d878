//! # satchel-export
//!
//! Archive export collaborator for the satchel document store: a thin
//! wrapper that packs the file documents of one grouping (aspect, briefcase,
//! or collection) into a password-protectable zip container.

mod archive;

pub use archive::{export_archive, GroupSelector};
