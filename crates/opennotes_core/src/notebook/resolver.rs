//! Notebook resolution, creation and persistence.
//!
//! Stateless functions over an explicit [`AppContext`].
//!
//! # Invariants
//! - Loading never fails loudly: unreadable, malformed or invalid markers
//!   yield `None` and a debug log entry.
//! - `list` emits registered notebooks first (registration order), then
//!   ancestors of the working directory (nearest first), without dedupe.
//! - `infer` priority: override path, then first context match in `list`
//!   order, then `None`.

use super::{AppContext, Notebook, NotebookConfig, NotebookError, NotebookResult};
use crate::display::NoticeTemplate;
use crate::paths::{absolutize, ancestors, path_to_string, resolve_from};
use crate::schema::{validate_notebook_name, validate_path, MARKER_FILE_NAME};
use log::{debug, info, warn};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Returns whether `path` directly contains a notebook marker.
pub fn has_notebook(path: &Path) -> bool {
    if path.as_os_str().is_empty() {
        return false;
    }
    path.join(MARKER_FILE_NAME).is_file()
}

/// Reads and validates the marker in notebook directory `path`.
pub fn load_config(path: &Path) -> Option<NotebookConfig> {
    let dir = match absolutize(path) {
        Ok(dir) => dir,
        Err(err) => {
            debug!(
                "event=notebook_load module=notebook status=skipped reason=bad_path path={} error={err}",
                path.display()
            );
            return None;
        }
    };
    let config_path = dir.join(MARKER_FILE_NAME);

    let text = match std::fs::read_to_string(&config_path) {
        Ok(text) => text,
        Err(err) => {
            debug!(
                "event=notebook_load module=notebook status=skipped reason=read_failed path={} error={err}",
                config_path.display()
            );
            return None;
        }
    };
    let raw = match serde_json::from_str::<Value>(&text) {
        Ok(raw) => raw,
        Err(err) => {
            debug!(
                "event=notebook_load module=notebook status=skipped reason=parse_failed path={} error={err}",
                config_path.display()
            );
            return None;
        }
    };

    match NotebookConfig::from_marker(raw, config_path.clone()) {
        Ok(config) => {
            debug!(
                "event=notebook_load module=notebook status=ok path={} name={}",
                config_path.display(),
                config.name
            );
            Some(config)
        }
        Err(errors) => {
            debug!(
                "event=notebook_load module=notebook status=skipped reason=invalid path={} errors={}",
                config_path.display(),
                errors.pretty_print().replace('\n', " ")
            );
            None
        }
    }
}

/// Loads the notebook in directory `path` and binds its note accessor.
pub fn load(ctx: &AppContext, path: &Path) -> Option<Notebook> {
    load_config(path).map(|config| Notebook::bind(config, ctx.db.clone()))
}

/// Same as [`load`].
pub fn open(ctx: &AppContext, path: &Path) -> Option<Notebook> {
    load(ctx, path)
}

/// Creates a notebook in `base_path` with a catch-all group, `base_path`
/// as its only context and `base_path/.notes` as notes root.
///
/// # Errors
/// - [`NotebookError::InvalidName`] for a rejected `name`.
/// - I/O, serialization or registration failures.
pub fn create(
    ctx: &AppContext,
    name: &str,
    base_path: &Path,
    register: bool,
) -> NotebookResult<Notebook> {
    validate_notebook_name(name).map_err(NotebookError::InvalidName)?;
    validate_path(&path_to_string(base_path)).map_err(NotebookError::InvalidPath)?;
    let base = absolutize(base_path).map_err(|source| NotebookError::Io {
        path: base_path.to_path_buf(),
        source,
    })?;

    let config = NotebookConfig::new_default(name, &base);
    std::fs::create_dir_all(&config.notes_root).map_err(|source| NotebookError::Io {
        path: config.notes_root.clone(),
        source,
    })?;

    let notebook = Notebook::bind(config, ctx.db.clone());
    save_config(ctx, &notebook, register)?;

    info!(
        "event=notebook_create module=notebook status=ok path={} registered={register}",
        notebook.dir().display()
    );
    ctx.notify(
        NoticeTemplate::NotebookCreated,
        &json!({"name": name, "path": path_to_string(notebook.dir())}),
    );
    Ok(notebook)
}

/// Every loadable notebook: registered ones, then ancestors of `cwd`.
pub fn list(ctx: &AppContext, cwd: &Path) -> Vec<Notebook> {
    let mut notebooks = Vec::new();

    for registered in ctx.config.store().notebooks {
        let path = PathBuf::from(&registered);
        if !has_notebook(&path) {
            debug!(
                "event=notebook_list module=notebook status=skipped reason=missing_marker path={registered}"
            );
            continue;
        }
        if let Some(notebook) = load(ctx, &path) {
            notebooks.push(notebook);
        }
    }

    match absolutize(cwd) {
        Ok(cwd) => {
            for dir in ancestors(&cwd) {
                if !has_notebook(&dir) {
                    continue;
                }
                if let Some(notebook) = load(ctx, &dir) {
                    notebooks.push(notebook);
                }
            }
        }
        Err(err) => {
            warn!(
                "event=notebook_list module=notebook status=partial reason=bad_cwd cwd={} error={err}",
                cwd.display()
            );
        }
    }

    debug!(
        "event=notebook_list module=notebook status=ok cwd={} count={}",
        cwd.display(),
        notebooks.len()
    );
    notebooks
}

/// Picks the active notebook for `cwd`.
pub fn infer(ctx: &AppContext, cwd: &Path) -> Option<Notebook> {
    if let Some(override_path) = ctx.config.notebook_path() {
        let path = PathBuf::from(&override_path);
        if has_notebook(&path) {
            if let Some(notebook) = load(ctx, &path) {
                info!(
                    "event=notebook_infer module=notebook status=ok source=override path={override_path}"
                );
                return Some(notebook);
            }
        }
        debug!(
            "event=notebook_infer module=notebook status=skipped source=override reason=invalid path={override_path}"
        );
    }

    let cwd = match absolutize(cwd) {
        Ok(cwd) => cwd,
        Err(err) => {
            warn!(
                "event=notebook_infer module=notebook status=error reason=bad_cwd cwd={} error={err}",
                cwd.display()
            );
            return None;
        }
    };
    let cwd_text = path_to_string(&cwd);

    for notebook in list(ctx, &cwd) {
        if let Some(context) = notebook.match_context(&cwd_text, ctx.context_match) {
            info!(
                "event=notebook_infer module=notebook status=ok source=context context={context} mode={} path={}",
                ctx.context_match,
                notebook.dir().display()
            );
            return Some(notebook);
        }
    }

    debug!("event=notebook_infer module=notebook status=none cwd={cwd_text}");
    None
}

/// Adds `path` (made absolute) to the notebook's contexts and persists it.
///
/// Returns the notebook unchanged when the context is already present,
/// either as given or in normalized form.
pub fn add_context(ctx: &AppContext, notebook: &Notebook, path: &Path) -> NotebookResult<Notebook> {
    let raw = path_to_string(path);
    let context = absolutize(path).map_err(|source| NotebookError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let context = path_to_string(&context);
    let vars = json!({
        "contextPath": context,
        "notebookPath": path_to_string(notebook.dir()),
    });

    if notebook.config.has_context(&raw) || notebook.config.has_context(&context) {
        debug!(
            "event=notebook_add_context module=notebook status=skipped reason=exists context={context}"
        );
        ctx.notify(NoticeTemplate::ContextAlreadyExists, &vars);
        return Ok(notebook.clone());
    }

    let updated = notebook.with_config(notebook.config.with_context(context.clone()));
    save_config(ctx, &updated, false)?;

    info!(
        "event=notebook_add_context module=notebook status=ok context={context} contexts={}",
        updated.config.contexts.len()
    );
    ctx.notify(NoticeTemplate::ContextAdded, &vars);
    Ok(updated)
}

/// Writes the marker file and, with `register`, adds the notebook
/// directory to the global registry.
pub fn save_config(ctx: &AppContext, notebook: &Notebook, register: bool) -> NotebookResult<()> {
    let config_path = notebook.path();
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| NotebookError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let text = serde_json::to_string_pretty(&notebook.config.to_stored())
        .map_err(NotebookError::Serialize)?;
    std::fs::write(config_path, text).map_err(|source| NotebookError::Io {
        path: config_path.to_path_buf(),
        source,
    })?;
    debug!(
        "event=notebook_save module=notebook status=ok path={}",
        config_path.display()
    );

    if register {
        ctx.config
            .register_notebook(&path_to_string(notebook.dir()))?;
    }
    Ok(())
}

/// Registers an existing notebook globally, optionally adding `context`.
///
/// # Errors
/// - [`NotebookError::NotFound`] when `path` holds no marker.
/// - [`NotebookError::InvalidNotebook`] when the marker fails to load.
pub fn register(
    ctx: &AppContext,
    path: &Path,
    context: Option<&Path>,
) -> NotebookResult<Notebook> {
    let dir = absolutize(path).map_err(|source| NotebookError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !has_notebook(&dir) {
        return Err(NotebookError::NotFound(dir));
    }
    let notebook = load(ctx, &dir).ok_or_else(|| NotebookError::InvalidNotebook(dir.clone()))?;

    let added = ctx.config.register_notebook(&path_to_string(&dir))?;
    info!(
        "event=notebook_register module=notebook status=ok path={} added={added}",
        dir.display()
    );

    match context {
        Some(context) => add_context(ctx, &notebook, context),
        None => Ok(notebook),
    }
}

/// Reads template `name`; relative paths resolve against the notebook
/// directory.
///
/// Unknown names are `None`. Read failures are logged, reported as a
/// notice and also yield `None`.
pub fn load_template(ctx: &AppContext, notebook: &Notebook, name: &str) -> Option<String> {
    let configured = notebook.config.templates.get(name)?;
    let result = resolve_from(notebook.dir(), configured).and_then(|path| {
        std::fs::read_to_string(&path)
            .map_err(|err| std::io::Error::new(err.kind(), format!("{}: {err}", path.display())))
    });

    match result {
        Ok(text) => Some(text),
        Err(err) => {
            warn!(
                "event=template_load module=notebook status=error name={name} path={configured} error={err}"
            );
            ctx.notify(
                NoticeTemplate::TemplateLoadError,
                &json!({"templatePath": configured, "error": err.to_string()}),
            );
            None
        }
    }
}
