//! Core library for the inventory-tools command line application.
//!
//! The library turns a spreadsheet host table into an automation inventory
//! document. Responsibilities are kept narrow: the pure conversion core lives
//! in [`inventory::tools::columns`], [`inventory::tools::address`],
//! [`inventory::tools::validate`], [`inventory::tools::build`] and
//! [`inventory::tools::pipeline`]; data representations sit inside
//! [`inventory::tools::model`]; file adapters live under
//! [`inventory::tools::io`]; and the file-to-file orchestration is in
//! [`inventory::tools::sync`].

pub mod inventory;

pub use inventory::tools::{
    Result, ToolError, address, build, columns, config, error, hosts, io, model, pipeline, sync,
    validate,
};
