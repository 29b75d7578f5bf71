//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Compile the route table from the supplied route descriptors
//! - Assemble router, session store and static resources
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener is bound last, by the server, once everything else is ready

use std::sync::Arc;

use crate::assets::StaticFiles;
use crate::config::{validate_config, ServerConfig, ValidationError};
use crate::http::dispatch::Dispatcher;
use crate::net::ListenerError;
use crate::observability::LogSink;
use crate::routing::{PatternError, Route, RouteTable, Router};
use crate::session::SessionStore;

/// A failure that prevents the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid configuration: {}", join(.0))]
    Config(Vec<ValidationError>),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Listener(#[from] ListenerError),
}

fn join(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Build the request pipeline described by `config`.
pub fn build_dispatcher(
    config: &ServerConfig,
    routes: impl IntoIterator<Item = Route>,
    log: Option<LogSink>,
) -> Result<Dispatcher, StartupError> {
    validate_config(config).map_err(StartupError::Config)?;

    let table = RouteTable::from_routes(routes)?;
    tracing::info!(routes = table.len(), "Route table compiled");

    let mut router = Router::new(table);
    if let Some(root) = &config.static_files.root {
        tracing::info!(root = %root.display(), "Serving static files");
        router = router.with_static_resources(Arc::new(StaticFiles::new(root)));
    }
    if let Some(path) = config.error_handler_path() {
        router = router.with_error_path(path);
    }
    if let Some(log) = &log {
        router = router.with_log(Arc::clone(log));
    }

    let sessions = SessionStore::new(config.session.duration());

    Ok(Dispatcher::new(router, sessions).with_log(log))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::Response;

    #[test]
    fn rejects_invalid_config() {
        let mut config = ServerConfig::default();
        config.listener.max_connections = Some(-1);
        config.observability.log_level = "loud".into();

        let err = build_dispatcher(&config, Vec::new(), None).err().unwrap();
        let StartupError::Config(errors) = &err else {
            panic!("expected config error, got {err:?}");
        };
        assert_eq!(errors.len(), 2);
        assert!(err.to_string().contains("max_connections"));
    }

    #[test]
    fn rejects_bad_route_pattern() {
        let routes = vec![Route::get("/{id}/{id}", |_| Ok(Response::new(200)))];
        let err = build_dispatcher(&ServerConfig::default(), routes, None).err().unwrap();
        assert!(matches!(err, StartupError::Pattern(_)));
    }

    #[test]
    fn wires_error_path_and_session_duration() {
        let mut config = ServerConfig::default();
        config.error_handler_path = Some("/oops/".into());
        config.session.duration_secs = 30;

        let routes = vec![Route::get("/", |_| Ok(Response::new(200)))];
        let dispatcher = build_dispatcher(&config, routes, None).unwrap();
        assert_eq!(dispatcher.router().error_path(), Some("oops"));
        assert_eq!(dispatcher.router().table().len(), 1);
        assert_eq!(dispatcher.sessions().duration().as_secs(), 30);
    }
}
