//! Name-to-factory registry for scenes.

use std::collections::HashMap;

use crate::scene::Scene;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("scene `{0}` is already registered")]
    DuplicateScene(String),
    #[error("no scene registered under `{0}`")]
    UnknownScene(String),
}

pub type SceneFactory = Box<dyn Fn() -> Box<dyn Scene>>;

/// Explicitly constructed registry, owned by the app and handed to the
/// scene manager. Registration happens once at startup; transitions resolve
/// against it for the process lifetime.
#[derive(Default)]
pub struct SceneDB {
    factories: HashMap<String, SceneFactory>,
    /// Registration order, for diagnostics only.
    order: Vec<String>,
}

impl SceneDB {
    pub fn new() -> SceneDB {
        SceneDB::default()
    }

    /// Register a factory under a fresh name. Re-registering an existing
    /// name is an error; use [`SceneDB::replace`] when that is intended.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), SceneError>
    where
        F: Fn() -> Box<dyn Scene> + 'static,
    {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(SceneError::DuplicateScene(name));
        }
        self.order.push(name.clone());
        self.factories.insert(name, Box::new(factory));
        Ok(())
    }

    /// Swap the factory under an existing name.
    pub fn replace<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), SceneError>
    where
        F: Fn() -> Box<dyn Scene> + 'static,
    {
        let name = name.into();
        if !self.factories.contains_key(&name) {
            return Err(SceneError::UnknownScene(name));
        }
        self.factories.insert(name, Box::new(factory));
        Ok(())
    }

    /// Construct a fresh scene instance.
    pub fn create(&self, name: &str) -> Result<Box<dyn Scene>, SceneError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| SceneError::UnknownScene(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }
}
