//! Generator registry for selecting generators by id or extension

use super::{Generator, JsonGenerator, PythonGenerator, RenderInput, TypeScriptGenerator};
use crate::error::{Error, Result};

/// Registry of available generators, in registration order.
pub struct GeneratorRegistry {
    generators: Vec<Box<dyn Generator>>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            generators: Vec::new(),
        }
    }

    /// Create a registry with the python, typescript and json generators.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PythonGenerator));
        registry.register(Box::new(TypeScriptGenerator));
        registry.register(Box::new(JsonGenerator));
        registry
    }

    /// Register a generator, replacing any existing one with the same id.
    pub fn register(&mut self, generator: Box<dyn Generator>) {
        self.generators.retain(|g| g.id() != generator.id());
        self.generators.push(generator);
    }

    pub fn get(&self, id: &str) -> Option<&dyn Generator> {
        self.generators
            .iter()
            .find(|g| g.id() == id)
            .map(|g| g.as_ref())
    }

    /// The generator that claims `extension` (without the dot).
    pub fn for_extension(&self, extension: &str) -> Option<&dyn Generator> {
        self.generators
            .iter()
            .find(|g| g.extensions().iter().any(|e| *e == extension))
            .map(|g| g.as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> Vec<&'static str> {
        self.generators.iter().map(|g| g.id()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Generator> {
        self.generators.iter().map(|g| g.as_ref())
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Render with the generator named `id`.
    ///
    /// # Errors
    ///
    /// [`Error::TemplateNotFound`] when no generator has that id, otherwise
    /// whatever the generator returns.
    pub fn render(&self, id: &str, input: &RenderInput<'_>) -> Result<String> {
        let generator = self.get(id).ok_or_else(|| Error::TemplateNotFound {
            id: id.to_string(),
            available: self.ids().join(", "),
        })?;
        let text = generator.render(input)?;
        tracing::debug!(generator = id, bytes = text.len(), "rendered artifact");
        Ok(text)
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
