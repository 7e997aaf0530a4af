//! Object factory contract used by the host whenever it needs a component.

use std::{
    any::{Any, TypeId},
    fmt,
    sync::Arc,
};

use {thiserror::Error, tracing::debug};

use crate::framework::Configuration;

/// A type-erased component instance.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// A no-argument constructor.
pub type ConstructFn = fn() -> Result<Instance, ConstructError>;

// ── Errors ──────────────────────────────────────────────────────────────────

/// Raised by a constructor that ran and failed.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConstructError {
    message: String,
}

impl ConstructError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The only failures an [`ObjectFactory`] reports to its caller.
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("cannot instantiate {type_name}: {reason}")]
    Instantiation { type_name: String, reason: String },

    #[error("constructor of {type_name} is not accessible")]
    Access { type_name: String },
}

impl FactoryError {
    #[must_use]
    pub fn instantiation(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Instantiation {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn access(type_name: impl Into<String>) -> Self {
        Self::Access {
            type_name: type_name.into(),
        }
    }
}

// ── ComponentType ───────────────────────────────────────────────────────────

/// How a component can be built without a container.
#[derive(Clone, Copy)]
pub enum Constructor {
    /// A callable no-argument constructor.
    Public(ConstructFn),
    /// A constructor exists but may not be invoked from outside its owner.
    Restricted,
    /// No no-argument constructor.
    Missing,
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public(_) => f.write_str("Public"),
            Self::Restricted => f.write_str("Restricted"),
            Self::Missing => f.write_str("Missing"),
        }
    }
}

/// Runtime handle for a concrete component type.
#[derive(Clone)]
pub struct ComponentType {
    name: &'static str,
    simple_name: &'static str,
    type_id: TypeId,
    constructor: Constructor,
}

impl ComponentType {
    pub fn of<T: Any + Send + Sync>(constructor: Constructor) -> Self {
        let name = std::any::type_name::<T>();
        Self {
            name,
            simple_name: simple_name(name),
            type_id: TypeId::of::<T>(),
            constructor,
        }
    }

    /// A component built through its `Default` impl.
    pub fn of_default<T: Any + Send + Sync + Default>() -> Self {
        Self::of::<T>(Constructor::Public(construct_default::<T>))
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without module path or generic arguments.
    pub fn simple_name(&self) -> &'static str {
        self.simple_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn constructor(&self) -> Constructor {
        self.constructor
    }

    /// Whether `instance` is of this concrete type.
    pub fn matches(&self, instance: &Instance) -> bool {
        (**instance).type_id() == self.type_id
    }

    /// Build the component directly, bypassing any container.
    pub fn construct(&self) -> Result<Instance, FactoryError> {
        match self.constructor {
            Constructor::Public(construct) => {
                let instance = construct()
                    .map_err(|e| FactoryError::instantiation(self.name, e.to_string()))?;
                if self.matches(&instance) {
                    Ok(instance)
                } else {
                    Err(FactoryError::instantiation(
                        self.name,
                        "constructor produced a different type",
                    ))
                }
            },
            Constructor::Restricted => Err(FactoryError::access(self.name)),
            Constructor::Missing => Err(FactoryError::instantiation(
                self.name,
                "no accessible no-argument constructor",
            )),
        }
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentType")
            .field("name", &self.name)
            .field("constructor", &self.constructor)
            .finish()
    }
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ComponentType {}

fn construct_default<T: Any + Send + Sync + Default>() -> Result<Instance, ConstructError> {
    Ok(Arc::new(T::default()))
}

fn simple_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Types that can describe themselves to an [`ObjectFactory`].
pub trait Component: Any + Send + Sync + Sized {
    fn component_type() -> ComponentType;
}

// ── FactoryStatus ───────────────────────────────────────────────────────────

/// Lifecycle state of a factory, observable by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FactoryStatus {
    #[default]
    Unconfigured,
    Ready,
    /// Configuration failed; instances are built directly.
    Degraded { reason: String },
}

impl FactoryStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

// ── ObjectFactory ───────────────────────────────────────────────────────────

/// Resolves component instances for the host.
pub trait ObjectFactory: Send + Sync + fmt::Display {
    /// One-time setup, before the factory is shared.
    fn configure(&mut self, config: &Arc<Configuration>);

    /// Return an instance of `concrete`, requested as `capability`.
    fn new_instance(
        &self,
        capability: &'static str,
        concrete: &ComponentType,
    ) -> Result<Instance, FactoryError>;

    /// Make `component` available for later injection. No instance is built.
    fn allow_injection_of(&self, component: ComponentType) -> &dyn ObjectFactory;

    fn status(&self) -> FactoryStatus;
}

/// Typed front-end for [`ObjectFactory::new_instance`].
///
/// `T` names the capability the caller wants (often a `dyn Trait`); the
/// returned `Arc<C>` coerces to it at the call site.
pub fn resolve<T, C>(factory: &dyn ObjectFactory) -> Result<Arc<C>, FactoryError>
where
    T: ?Sized + 'static,
    C: Component,
{
    let concrete = C::component_type();
    let instance = factory.new_instance(std::any::type_name::<T>(), &concrete)?;
    instance.downcast::<C>().map_err(|_| {
        FactoryError::instantiation(concrete.name(), "factory returned an instance of another type")
    })
}

// ── DirectObjectFactory ─────────────────────────────────────────────────────

/// Host default: always constructs components directly.
#[derive(Debug, Default)]
pub struct DirectObjectFactory {
    status: FactoryStatus,
}

impl DirectObjectFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectFactory for DirectObjectFactory {
    fn configure(&mut self, _config: &Arc<Configuration>) {
        self.status = FactoryStatus::Ready;
    }

    fn new_instance(
        &self,
        capability: &'static str,
        concrete: &ComponentType,
    ) -> Result<Instance, FactoryError> {
        debug!(capability, component = concrete.name(), "constructing component directly");
        concrete.construct()
    }

    fn allow_injection_of(&self, component: ComponentType) -> &dyn ObjectFactory {
        debug!(component = component.name(), "injection not supported, ignoring");
        self
    }

    fn status(&self) -> FactoryStatus {
        self.status.clone()
    }
}

impl fmt::Display for DirectObjectFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Direct ObjectFactory")
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    #[derive(Default)]
    struct GreeterImpl;

    impl Greeter for GreeterImpl {
        fn greet(&self) -> String {
            "hello".into()
        }
    }

    impl Component for GreeterImpl {
        fn component_type() -> ComponentType {
            ComponentType::of_default::<Self>()
        }
    }

    struct Locked;

    impl Component for Locked {
        fn component_type() -> ComponentType {
            ComponentType::of::<Self>(Constructor::Restricted)
        }
    }

    struct Exploding;

    impl Component for Exploding {
        fn component_type() -> ComponentType {
            ComponentType::of::<Self>(Constructor::Public(|| Err(ConstructError::new("boom"))))
        }
    }

    struct Generic<T>(T);

    #[rstest]
    #[case(std::any::type_name::<GreeterImpl>(), "GreeterImpl")]
    #[case(std::any::type_name::<Generic<String>>(), "Generic")]
    #[case("Plain", "Plain")]
    fn simple_names_strip_paths_and_generics(#[case] full: &'static str, #[case] expected: &str) {
        assert_eq!(simple_name(full), expected);
    }

    #[test]
    fn direct_factory_resolves_to_capability() {
        let factory = DirectObjectFactory::new();
        let greeter: Arc<dyn Greeter> = resolve::<dyn Greeter, GreeterImpl>(&factory).unwrap();
        assert_eq!(greeter.greet(), "hello");
    }

    #[test]
    fn restricted_constructor_is_an_access_error() {
        assert!(matches!(
            resolve::<Locked, Locked>(&DirectObjectFactory::new()),
            Err(FactoryError::Access { .. })
        ));
    }

    #[test]
    fn failing_constructor_is_an_instantiation_error() {
        let err = Exploding::component_type().construct().unwrap_err();
        match err {
            FactoryError::Instantiation { reason, .. } => assert_eq!(reason, "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_constructor_is_an_instantiation_error() {
        let ty = ComponentType::of::<Generic<u8>>(Constructor::Missing);
        assert!(matches!(
            ty.construct(),
            Err(FactoryError::Instantiation { .. })
        ));
    }

    #[test]
    fn constructor_of_wrong_type_is_rejected() {
        let ty = ComponentType::of::<GreeterImpl>(Constructor::Public(|| Ok(Arc::new(7_u8))));
        assert!(ty.construct().is_err());
    }

    #[test]
    fn direct_factory_becomes_ready_on_configure() {
        let mut factory = DirectObjectFactory::new();
        assert_eq!(factory.status(), FactoryStatus::Unconfigured);
        let config = Arc::new(Configuration::new(Arc::new(crate::Framework::new())));
        factory.configure(&config);
        assert_eq!(factory.status(), FactoryStatus::Ready);
        assert_eq!(factory.to_string(), "Direct ObjectFactory");
    }
}
