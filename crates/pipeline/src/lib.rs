//! Host-side contracts of the comet request pipeline.
//!
//! Plugins implement [`Interceptor`], [`BroadcastFilter`] or [`ObjectFactory`]
//! and are attached explicitly through [`PipelineBuilder`]; each receives the
//! shared [`Configuration`] exactly once before traffic starts.

pub mod action;
pub mod factory;
pub mod filter;
pub mod framework;
pub mod interceptor;
pub mod pipeline;

pub use {
    action::Action,
    factory::{
        Component, ComponentType, ConstructError, Constructor, DirectObjectFactory,
        FactoryError, FactoryStatus, Instance, ObjectFactory, resolve,
    },
    filter::{BroadcastAction, BroadcastFilter, FilterChain},
    framework::{Configuration, Framework, RuntimeContext},
    interceptor::Interceptor,
    pipeline::{Pipeline, PipelineBuilder},
};
