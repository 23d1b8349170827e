//! Planning request adapters for Eos
//!
//! An adapter sits in front of a planner: it may amend the request before the
//! planner sees it and the response after the planner returns, but it never
//! changes whether planning succeeded. Adapters are created by name through an
//! [`AdapterRegistry`].

/// Bounds correction pass
pub mod corrector;
/// The start state bounds adapter
pub mod fix_start_state_bounds;
/// Joint normalization pass
pub mod normalizer;
/// Trajectory prefix insertion
pub mod patcher;

pub use fix_start_state_bounds::{ADAPTER_NAME as FIX_START_STATE_BOUNDS, FixStartStateBounds};

use crate::AdapterError;
use crate::config::ParameterSource;
use crate::diagnostics::DiagnosticSink;
use crate::planning::{MotionPlanRequest, MotionPlanResponse, Planner, PlanningScene};
use std::collections::BTreeMap;

/// Result of one adapted planning call
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterOutcome {
    /// Planner response, possibly amended by the adapter
    pub response: MotionPlanResponse,
    /// The planner's own success flag
    pub success: bool,
    /// Indices of waypoints added by adapters, shifted to match the response
    pub added_path_index: Vec<usize>,
}

/// Wraps a planner call, adjusting its input and output.
///
/// Implementations hold only read-only configuration; every call works on its
/// own copies, so one adapter can serve many threads at once.
pub trait PlanningRequestAdapter: Send + Sync {
    /// Short human readable name
    fn description(&self) -> &str;

    /// Runs `planner` on a possibly amended `request`. `added_path_index` lists
    /// waypoints that earlier adapters inserted; the updated list is returned.
    fn adapt(
        &self,
        planner: &dyn Planner,
        scene: &PlanningScene,
        request: &MotionPlanRequest,
        added_path_index: Vec<usize>,
        diagnostics: &dyn DiagnosticSink,
    ) -> AdapterOutcome;
}

/// Builds an adapter from the parameters found under a namespace
pub type AdapterFactory = fn(&ParameterSource, &str) -> Result<Box<dyn PlanningRequestAdapter>, AdapterError>;

/// Named set of adapter factories
#[derive(Debug, Clone, Default)]
pub struct AdapterRegistry {
    factories: BTreeMap<String, AdapterFactory>,
}

impl AdapterRegistry {
    /// Registry with no adapters
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every adapter shipped with this crate
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .factories
            .insert(FIX_START_STATE_BOUNDS.to_string(), create_fix_start_state_bounds);
        registry
    }

    /// Adds a factory; names must be unique
    pub fn register(&mut self, name: &str, factory: AdapterFactory) -> Result<(), AdapterError> {
        if self.factories.contains_key(name) {
            return Err(AdapterError::DuplicateAdapter(name.to_string()));
        }
        self.factories.insert(name.to_string(), factory);
        log::debug!("Registered planning adapter '{}'", name);
        Ok(())
    }

    /// True if `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Instantiates the adapter registered as `name`
    pub fn create(
        &self,
        name: &str,
        params: &ParameterSource,
        namespace: &str,
    ) -> Result<Box<dyn PlanningRequestAdapter>, AdapterError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| AdapterError::UnknownAdapter(name.to_string()))?;
        let adapter = factory(params, namespace)?;
        log::info!("Loaded planning adapter '{}' ({})", name, adapter.description());
        Ok(adapter)
    }
}

fn create_fix_start_state_bounds(
    params: &ParameterSource,
    namespace: &str,
) -> Result<Box<dyn PlanningRequestAdapter>, AdapterError> {
    Ok(Box::new(FixStartStateBounds::from_params(params, namespace)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PassThrough;

    impl PlanningRequestAdapter for PassThrough {
        fn description(&self) -> &str {
            "Pass Through"
        }

        fn adapt(
            &self,
            planner: &dyn Planner,
            scene: &PlanningScene,
            request: &MotionPlanRequest,
            added_path_index: Vec<usize>,
            _diagnostics: &dyn DiagnosticSink,
        ) -> AdapterOutcome {
            let mut response = MotionPlanResponse::default();
            let success = planner.plan(scene, request, &mut response);
            AdapterOutcome { response, success, added_path_index }
        }
    }

    fn pass_through(_: &ParameterSource, _: &str) -> Result<Box<dyn PlanningRequestAdapter>, AdapterError> {
        Ok(Box::new(PassThrough))
    }

    #[test]
    fn test_defaults_contain_fix_start_state_bounds() {
        let registry = AdapterRegistry::with_defaults();
        assert!(registry.contains("fix_start_state_bounds"));
        let adapter = registry.create("fix_start_state_bounds", &ParameterSource::empty(), "").unwrap();
        assert_eq!(adapter.description(), "Fix Start State Bounds");
    }

    #[test]
    fn test_register_custom_adapter() {
        let mut registry = AdapterRegistry::with_defaults();
        registry.register("pass_through", pass_through).unwrap();

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["fix_start_state_bounds", "pass_through"]);
        assert!(matches!(
            registry.register("pass_through", pass_through),
            Err(AdapterError::DuplicateAdapter(_))
        ));
    }

    #[test]
    fn test_unknown_adapter() {
        let registry = AdapterRegistry::new();
        assert!(matches!(
            registry.create("fix_start_state_bounds", &ParameterSource::empty(), ""),
            Err(AdapterError::UnknownAdapter(_))
        ));
    }
}
