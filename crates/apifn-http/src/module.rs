use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use apifn_core::model::{Annotations, Api, SecurityScheme};

use crate::executor::RequestExecutor;
use crate::function::Function;
use crate::operation::Operation;
use crate::settings::HttpSettings;
use crate::view::{ViewOverlay, view_descriptions};

#[derive(Debug)]
pub(crate) struct ModuleInner {
    api: Api,
    settings: RwLock<HttpSettings>,
    executor: RequestExecutor,
    functions: OnceLock<Vec<Function>>,
}

/// Callable functions over one API description.
///
/// Owns the resolved description, the shared HTTP settings and the lazily
/// built list of [`Function`]s. Operations keep a weak back-reference so they
/// read the settings at call time. Cloning is cheap and clones share settings
/// and functions.
#[derive(Debug, Clone)]
pub struct Module {
    inner: Arc<ModuleInner>,
}

impl Module {
    /// Settings start with the description's `baseUri`, if any.
    pub fn new(api: Api) -> Self {
        Self::with_executor(api, RequestExecutor::new())
    }

    pub fn with_executor(api: Api, executor: RequestExecutor) -> Self {
        let settings = HttpSettings {
            base_uri: api.base_uri.clone(),
            ..HttpSettings::default()
        };
        Self {
            inner: Arc::new(ModuleInner {
                api,
                settings: RwLock::new(settings),
                executor,
                functions: OnceLock::new(),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Arc<ModuleInner>) -> Self {
        Self { inner }
    }

    pub fn title(&self) -> &str {
        &self.inner.api.title
    }

    pub fn api(&self) -> &Api {
        &self.inner.api
    }

    /// Every operation followed by its views, in document order.
    ///
    /// Built on first access; later calls return the same list.
    pub fn functions(&self) -> &[Function] {
        self.inner.functions.get_or_init(|| self.build_functions())
    }

    /// Look up a function by id. The first match wins.
    pub fn function(&self, id: &str) -> Option<&Function> {
        self.functions().iter().find(|f| f.id() == id)
    }

    pub fn annotations(&self) -> &Annotations {
        &self.inner.api.annotations
    }

    pub fn security_schemas(&self) -> &[SecurityScheme] {
        &self.inner.api.security_schemes
    }

    /// A snapshot of the current settings.
    pub fn settings(&self) -> HttpSettings {
        self.inner
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_settings(&self, settings: HttpSettings) {
        self.update_settings(|current| *current = settings);
    }

    /// Mutate the settings in place. Calls already in flight keep the
    /// snapshot they started with.
    pub fn update_settings(&self, update: impl FnOnce(&mut HttpSettings)) {
        let mut guard = self
            .inner
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        update(&mut guard);
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.inner.executor
    }

    fn build_functions(&self) -> Vec<Function> {
        let mut functions = Vec::new();
        for method in self.inner.api.all_methods() {
            let operation = Arc::new(Operation::new(
                Arc::downgrade(&self.inner),
                method.clone(),
            ));
            let views = view_descriptions(&operation);
            functions.push(Function::Operation(Arc::clone(&operation)));
            for view in views {
                functions.push(Function::View(ViewOverlay::new(
                    Arc::clone(&operation),
                    view,
                )));
            }
        }
        log::debug!(
            "built {} functions for {}",
            functions.len(),
            self.inner.api.title
        );
        functions
    }
}

#[cfg(test)]
mod tests {
    use apifn_core::load_api_yaml;

    use super::*;

    const API: &str = r#"
title: Widgets
baseUri: http://widgets.test
resources:
  /widgets:
    methods:
      get:
        annotations:
          views:
            - id: firstPage
              fixedParameters:
                page: 1
        queryParameters:
          page?: integer
      post: {}
"#;

    #[test]
    fn test_settings_seeded_from_base_uri() {
        let module = Module::new(load_api_yaml(API).unwrap());
        assert_eq!(
            module.settings().base_uri.as_deref(),
            Some("http://widgets.test")
        );
        assert!(module.settings().user.is_none());
    }

    #[test]
    fn test_update_settings() {
        let module = Module::new(load_api_yaml(API).unwrap());
        module.update_settings(|s| s.user = Some("me".into()));
        let shared = module.clone();
        assert_eq!(shared.settings().user.as_deref(), Some("me"));

        module.set_settings(HttpSettings::default());
        assert!(shared.settings().base_uri.is_none());
    }

    #[test]
    fn test_functions_order() {
        let module = Module::new(load_api_yaml(API).unwrap());
        let ids: Vec<&str> = module.functions().iter().map(|f| f.id()).collect();
        assert_eq!(ids, vec!["widgets.get", "firstPage", "widgets.post"]);
        assert!(module.functions()[1].is_view());
    }

    #[test]
    fn test_functions_are_cached() {
        let module = Module::new(load_api_yaml(API).unwrap());
        let first = module.functions().as_ptr();
        assert_eq!(module.functions().as_ptr(), first);
        assert!(Arc::ptr_eq(
            module.functions()[0].operation(),
            module.functions()[1].operation()
        ));
    }

    #[test]
    fn test_operation_module_back_reference() {
        let module = Module::new(load_api_yaml(API).unwrap());
        let op = Arc::clone(module.function("widgets.post").unwrap().operation());
        assert_eq!(op.module().map(|m| m.title().to_string()).as_deref(), Some("Widgets"));
        drop(module);
        assert!(op.module().is_none());
    }
}
