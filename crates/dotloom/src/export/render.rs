//! Running a layout engine and persisting its output.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, info};
use tempfile::Builder;

use super::{
    RenderError,
    engine::{Engine, Format, LayoutEngine},
};

/// Drives one engine run for one diagram.
///
/// The DOT text is also written to `<dir>/<base>.gv` when the source is
/// kept; otherwise the engine's own intermediate file is all there is, and
/// the engine removes it. The engine's output is staged in a temporary file
/// next to the target and renamed to `<dir>/<base>.<ext>` only once it is
/// complete, so a failed render leaves no output file behind.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
///
/// use dotloom::export::{engine::{Format, GraphvizCommand, LayoutEngine}, render::RenderInvoker};
///
/// let engine = GraphvizCommand::default();
/// let invoker = RenderInvoker::new(&engine)
///     .with_layout(LayoutEngine::Neato)
///     .with_format(Format::new("png").unwrap());
///
/// let output = invoker
///     .invoke("digraph { a -> b }", Path::new("out"), "example")
///     .expect("Failed to render");
/// assert_eq!(output, Path::new("out/example.png"));
/// ```
#[derive(Debug)]
pub struct RenderInvoker<'e, E: ?Sized> {
    engine: &'e E,
    layout: LayoutEngine,
    format: Format,
    keep_source: bool,
}

impl<'e, E: Engine + ?Sized> RenderInvoker<'e, E> {
    /// Creates an invoker using `dot` and SVG, removing the source afterwards.
    pub fn new(engine: &'e E) -> Self {
        Self {
            engine,
            layout: LayoutEngine::default(),
            format: Format::default(),
            keep_source: false,
        }
    }

    pub fn with_layout(mut self, layout: LayoutEngine) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Keeps `<dir>/<base>.gv` after rendering instead of removing it.
    pub fn with_keep_source(mut self, keep_source: bool) -> Self {
        self.keep_source = keep_source;
        self
    }

    /// Path of the output file for `base` in `dir`.
    pub fn output_path(&self, dir: &Path, base: &str) -> PathBuf {
        dir.join(format!("{base}.{}", self.format.extension()))
    }

    /// Renders `dot` and writes the result to `<dir>/<base>.<ext>`.
    ///
    /// The engine is invoked exactly once. `dir` is created if missing.
    ///
    /// # Errors
    ///
    /// Returns the engine's [`RenderError`] unchanged, or [`RenderError::Io`]
    /// if the source or output cannot be written.
    pub fn invoke(&self, dot: &str, dir: &Path, base: &str) -> Result<PathBuf, RenderError> {
        fs::create_dir_all(dir)?;
        let target = self.output_path(dir, base);

        info!(
            layout = self.layout.to_string(),
            format = self.format.to_string(),
            output = target.display().to_string();
            "Rendering diagram"
        );

        if self.keep_source {
            write_source(dot, dir, base)?;
        }
        let bytes = self.engine.render(self.layout, &self.format, dot)?;

        let mut staged = Builder::new()
            .prefix(&format!(".{base}-"))
            .suffix(".part")
            .tempfile_in(dir)?;
        staged.write_all(&bytes)?;
        staged.flush()?;
        staged.persist(&target).map_err(|err| err.error)?;

        debug!(bytes = bytes.len(), output = target.display().to_string(); "Output written");
        Ok(target)
    }
}

/// Writes `dot` to `<dir>/<base>.gv` and returns the path.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the directory or file cannot be written.
pub fn write_source(dot: &str, dir: &Path, base: &str) -> Result<PathBuf, RenderError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{base}.gv"));
    fs::write(&path, dot)?;
    debug!(source = path.display().to_string(); "Wrote DOT source");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use tempfile::tempdir;

    use super::*;

    /// Records each call and answers with a fixed result.
    struct FakeEngine {
        calls: Cell<usize>,
        seen_source: RefCell<Option<String>>,
        fail_with: Option<String>,
    }

    impl FakeEngine {
        fn succeeding() -> Self {
            Self {
                calls: Cell::new(0),
                seen_source: RefCell::new(None),
                fail_with: None,
            }
        }

        fn failing(stderr: &str) -> Self {
            Self {
                fail_with: Some(stderr.to_string()),
                ..Self::succeeding()
            }
        }
    }

    impl Engine for FakeEngine {
        fn render(&self, layout: LayoutEngine, format: &Format, dot: &str) -> Result<Vec<u8>, RenderError> {
            self.calls.set(self.calls.get() + 1);
            *self.seen_source.borrow_mut() = Some(dot.to_string());

            match &self.fail_with {
                Some(stderr) => Err(RenderError::EngineFailed {
                    engine: layout,
                    status: "exit status: 1".to_string(),
                    stderr: stderr.clone().into_bytes(),
                }),
                None => Ok(format!("<{format} via {layout}>{dot}").into_bytes()),
            }
        }
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_invoke_writes_output_only() {
        let dir = tempdir().unwrap();
        let engine = FakeEngine::succeeding();

        let output = RenderInvoker::new(&engine)
            .invoke("digraph { a }", dir.path(), "data_flow")
            .unwrap();

        assert_eq!(output, dir.path().join("data_flow.svg"));
        assert_eq!(fs::read_to_string(&output).unwrap(), "<svg via dot>digraph { a }");
        assert_eq!(engine.calls.get(), 1);
        assert_eq!(entries(dir.path()), vec!["data_flow.svg"]);
        assert_eq!(engine.seen_source.borrow().as_deref(), Some("digraph { a }"));
    }

    #[test]
    fn test_invoke_keeps_source_when_asked() {
        let dir = tempdir().unwrap();
        let engine = FakeEngine::succeeding();

        RenderInvoker::new(&engine)
            .with_keep_source(true)
            .with_layout(LayoutEngine::Circo)
            .with_format(Format::new("png:cairo").unwrap())
            .invoke("digraph { a }", dir.path(), "overview")
            .unwrap();

        assert_eq!(entries(dir.path()), vec!["overview.gv", "overview.png"]);
        assert_eq!(
            fs::read_to_string(dir.path().join("overview.gv")).unwrap(),
            "digraph { a }"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("overview.png")).unwrap(),
            "<png:cairo via circo>digraph { a }"
        );
    }

    #[test]
    fn test_failure_reports_stderr_verbatim_and_leaves_no_output() {
        let dir = tempdir().unwrap();
        let stderr = "Error: <stdin>: syntax error in line 1 near '->'\n";
        let engine = FakeEngine::failing(stderr);

        let err = RenderInvoker::new(&engine)
            .invoke("digraph { -> }", dir.path(), "broken")
            .unwrap_err();

        match err {
            RenderError::EngineFailed { stderr: reported, .. } => {
                assert_eq!(reported, stderr.as_bytes());
            }
            other => panic!("expected EngineFailed, got {other:?}"),
        }
        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn test_failure_replaces_nothing_from_earlier_render() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("stable.svg");
        fs::write(&target, "previous").unwrap();

        let engine = FakeEngine::failing("boom");
        let result = RenderInvoker::new(&engine).invoke("digraph {}", dir.path(), "stable");

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&target).unwrap(), "previous");
        assert_eq!(entries(dir.path()), vec!["stable.svg"]);
    }

    #[test]
    fn test_invoke_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("out").join("diagrams");
        let engine = FakeEngine::succeeding();

        let output = RenderInvoker::new(&engine)
            .invoke("digraph {}", &nested, "g")
            .unwrap();

        assert!(output.starts_with(&nested));
        assert!(output.exists());
    }

    #[test]
    fn test_write_source() {
        let dir = tempdir().unwrap();

        let path = write_source("graph {}", dir.path(), "plain").unwrap();

        assert_eq!(path, dir.path().join("plain.gv"));
        assert_eq!(fs::read_to_string(path).unwrap(), "graph {}");
    }
}
