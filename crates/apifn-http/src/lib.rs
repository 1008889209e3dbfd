pub mod error;
pub mod executor;
pub mod function;
pub mod module;
pub mod operation;
pub mod parameters;
pub mod request;
pub mod settings;
pub mod validation;
pub mod view;

pub use error::{CallError, ExecuteError, SettingsError};
pub use executor::RequestExecutor;
pub use function::Function;
pub use module::Module;
pub use operation::{Arguments, Operation};
pub use parameters::Parameter;
pub use request::{Auth, Request, RequestParameter};
pub use settings::{HttpSettings, SETTINGS_FILE_NAME, load_settings};
pub use validation::ValidationReport;
pub use view::{ViewDescription, ViewOverlay};
