//! Component resolution backed by an external component registry.
//!
//! [`ManagedObjectResolver`] asks a [`ComponentRegistry`] for instances,
//! registering concrete types lazily under their bean name, and constructs
//! the type directly whenever the registry cannot supply one.

pub mod error;
pub mod naming;
pub mod parent;
pub mod registry;
pub mod resolver;

pub use {
    error::{RegistryError, Result},
    naming::bean_name,
    parent::{ParentContextLookup, RootRegistryLookup},
    registry::{
        ComponentContext, ComponentContextProvider, ComponentRegistry, RegistryProvider,
        SharedRegistry,
    },
    resolver::{InstanceSource, ManagedObjectResolver, Resolution},
};
