#![doc = "lsif-upload-core: core pipeline for uploading LSIF dumps to a code intelligence service."]

//! This crate contains everything the `lsif-upload` binary does besides argument parsing:
//! resolving the upload context from the git workspace, building the upload request (or its
//! `curl` rendering), compressing the dump while it is sent, and interpreting the service's
//! response.
//!
//! # Usage
//! Construct a [`pipeline::UploadPipeline`] with a [`config::ServiceConfig`], a
//! [`contract::Workspace`] and a [`contract::BrowserLauncher`], then call
//! [`pipeline::UploadPipeline::run`] with the user's [`context::UploadOptions`].

pub mod compress;
pub mod config;
pub mod context;
pub mod contract;
pub mod error;
pub mod git;
pub mod pipeline;
pub mod remote;
pub mod request;
pub mod response;
pub mod transport;
