//! Helpers for building scenarios inside tests.
//!
//! ```
//! use scenarious::testing::ScenarioFixture;
//! use scenarious_model::{EntitySchema, RecordHandler, TypeHandler};
//! use std::rc::Rc;
//!
//! let fixture = ScenarioFixture::new([
//!     Rc::new(RecordHandler::new(EntitySchema::new("genre").default_value("name", "drama")))
//!         as Rc<dyn TypeHandler>,
//! ]);
//! let scenario = fixture.build(["genres: 2", "genres: [{name: comedy}]"]).unwrap();
//! assert_eq!(scenario.entities("genres").unwrap().len(), 3);
//! ```

use crate::config::ScenarioConfig;
use crate::error::{ScenarioError, ScenarioResult};
use crate::scenario::Scenario;
use crate::source::Source;
use scenarious_model::TypeHandler;
use scenarious_store::StoreError;
use scenarious_types::EntityRef;
use std::rc::Rc;

/// Builds one scenario from several sources, merged in order.
pub fn build_scenario<S>(sources: S, handlers: &[Rc<dyn TypeHandler>]) -> ScenarioResult<Scenario>
where
    S: IntoIterator,
    S::Item: Into<Source>,
{
    ScenarioFixture::new(handlers.iter().cloned()).build(sources)
}

/// The first entity of a type, for definitions that hold a single entity.
pub fn first(scenario: &Scenario, type_name: &str) -> ScenarioResult<EntityRef> {
    scenario
        .entities(type_name)?
        .into_iter()
        .next()
        .ok_or_else(|| ScenarioError::Store(StoreError::NotFound(type_name.to_string())))
}

/// A reusable set of handlers and settings for a test module.
#[derive(Clone)]
pub struct ScenarioFixture {
    handlers: Vec<Rc<dyn TypeHandler>>,
    config: ScenarioConfig,
}

impl ScenarioFixture {
    pub fn new(handlers: impl IntoIterator<Item = Rc<dyn TypeHandler>>) -> Self {
        Self {
            handlers: handlers.into_iter().collect(),
            config: ScenarioConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ScenarioConfig) -> Self {
        self.config = config;
        self
    }

    /// Reads every source, then builds once.
    pub fn build<S>(&self, sources: S) -> ScenarioResult<Scenario>
    where
        S: IntoIterator,
        S::Item: Into<Source>,
    {
        let mut scenario = Scenario::builder()
            .handlers(self.handlers.iter().cloned())
            .config(self.config.clone())
            .autobuild(false)
            .load()?;
        for source in sources {
            scenario.update(source)?;
        }
        scenario.build()?;
        Ok(scenario)
    }
}
