//! Configuration types for raster-to-SVG conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. One struct keeps the knobs easy to
//! share across threads and to print when comparing two runs.

use crate::error::Png2SvgError;
use crate::pipeline::trace::Tracer;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for a raster-to-SVG conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_png2svg::{ConversionConfig, TraceOptions};
///
/// let config = ConversionConfig::builder()
///     .keep_scratch(true)
///     .tool_timeout_secs(30)
///     .trace_options(TraceOptions { turd_size: Some(4), ..Default::default() })
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Default)]
pub struct ConversionConfig {
    /// Keep the scratch workspace (and its intermediate bitmap) after the
    /// call returns. Default: false.
    ///
    /// The retained directory is reported in
    /// [`crate::output::ConversionOutput::scratch_dir`].
    pub keep_scratch: bool,

    /// Parent directory for scratch workspaces. If None, uses the OS temp dir.
    pub scratch_root: Option<PathBuf>,

    /// Explicit path to the potrace executable.
    /// If None along with `tracer`, uses `potrace_locate::locate_potrace()`.
    pub tool_path: Option<PathBuf>,

    /// Pre-constructed tracer. Takes precedence over `tool_path`.
    pub tracer: Option<Arc<dyn Tracer>>,

    /// Kill the tracing process after this many seconds. Default: None (wait forever).
    ///
    /// potrace on a very large or noisy bitmap can run for minutes; set this
    /// when converting untrusted input in a service.
    pub tool_timeout_secs: Option<u64>,

    /// Extra tuning flags forwarded to potrace. Default: none set.
    pub trace_options: TraceOptions,

    /// Optional per-stage progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("keep_scratch", &self.keep_scratch)
            .field("scratch_root", &self.scratch_root)
            .field("tool_path", &self.tool_path)
            .field("tracer", &self.tracer.as_ref().map(|t| t.name().to_string()))
            .field("tool_timeout_secs", &self.tool_timeout_secs)
            .field("trace_options", &self.trace_options)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn keep_scratch(mut self, v: bool) -> Self {
        self.config.keep_scratch = v;
        self
    }

    pub fn scratch_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.scratch_root = Some(dir.into());
        self
    }

    pub fn tool_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.tool_path = Some(path.into());
        self
    }

    pub fn tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.config.tracer = Some(tracer);
        self
    }

    pub fn tool_timeout_secs(mut self, secs: u64) -> Self {
        self.config.tool_timeout_secs = Some(secs);
        self
    }

    pub fn trace_options(mut self, options: TraceOptions) -> Self {
        self.config.trace_options = options;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Png2SvgError> {
        let c = &self.config;
        if c.tool_timeout_secs == Some(0) {
            return Err(Png2SvgError::InvalidConfig(
                "Tool timeout must be ≥ 1 second".into(),
            ));
        }
        c.trace_options.validate()?;
        Ok(self.config)
    }
}

/// Optional potrace tuning flags.
///
/// Every field maps to one potrace command-line option and is only passed
/// when set, so the default invocation is plain `potrace --svg`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceOptions {
    /// Suppress speckles of up to this many pixels (`--turdsize`, potrace default 2).
    pub turd_size: Option<u32>,
    /// Corner threshold (`--alphamax`, potrace default 1.0). Accepted range is
    /// 0.0 (sharp polygons) to 1.3334 (smoothest curves).
    pub alpha_max: Option<f64>,
    /// Curve optimisation tolerance (`--opttolerance`, potrace default 0.2).
    pub opt_tolerance: Option<f64>,
    /// Black/white cutoff for the grayscale input (`--blacklevel`, potrace default 0.5).
    pub black_level: Option<f64>,
    /// Invert the bitmap before tracing (`--invert`).
    pub invert: bool,
}

impl TraceOptions {
    fn validate(&self) -> Result<(), Png2SvgError> {
        if let Some(a) = self.alpha_max {
            if !(0.0..=1.3334).contains(&a) {
                return Err(Png2SvgError::InvalidConfig(format!(
                    "alphamax must be 0.0–1.3334, got {a}"
                )));
            }
        }
        if let Some(k) = self.black_level {
            if !(0.0..=1.0).contains(&k) {
                return Err(Png2SvgError::InvalidConfig(format!(
                    "blacklevel must be 0.0–1.0, got {k}"
                )));
            }
        }
        if let Some(o) = self.opt_tolerance {
            if o.is_nan() || o < 0.0 {
                return Err(Png2SvgError::InvalidConfig(format!(
                    "opttolerance must be ≥ 0, got {o}"
                )));
            }
        }
        Ok(())
    }

    /// Render the options as potrace arguments, in a stable order.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(t) = self.turd_size {
            args.push("--turdsize".to_string());
            args.push(t.to_string());
        }
        if let Some(a) = self.alpha_max {
            args.push("--alphamax".to_string());
            args.push(a.to_string());
        }
        if let Some(o) = self.opt_tolerance {
            args.push("--opttolerance".to_string());
            args.push(o.to_string());
        }
        if let Some(k) = self.black_level {
            args.push("--blacklevel".to_string());
            args.push(k.to_string());
        }
        if self.invert {
            args.push("--invert".to_string());
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds() {
        let config = ConversionConfig::builder().build().expect("valid");
        assert!(!config.keep_scratch);
        assert!(config.tool_timeout_secs.is_none());
        assert!(config.trace_options.to_args().is_empty());
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = ConversionConfig::builder()
            .tool_timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Png2SvgError::InvalidConfig(_)));
    }

    #[test]
    fn out_of_range_alphamax_rejected() {
        let err = ConversionConfig::builder()
            .trace_options(TraceOptions {
                alpha_max: Some(2.0),
                ..Default::default()
            })
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("alphamax"), "got: {err}");
    }

    #[test]
    fn alphamax_upper_bound_is_inclusive() {
        let at = |a: f64| {
            ConversionConfig::builder()
                .trace_options(TraceOptions {
                    alpha_max: Some(a),
                    ..Default::default()
                })
                .build()
        };
        assert!(at(0.0).is_ok());
        assert!(at(1.3334).is_ok());
        assert!(at(1.34).is_err());
    }

    #[test]
    fn out_of_range_blacklevel_rejected() {
        let err = ConversionConfig::builder()
            .trace_options(TraceOptions {
                black_level: Some(1.5),
                ..Default::default()
            })
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("blacklevel"), "got: {err}");
    }

    #[test]
    fn nan_opttolerance_rejected() {
        let result = ConversionConfig::builder()
            .trace_options(TraceOptions {
                opt_tolerance: Some(f64::NAN),
                ..Default::default()
            })
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn trace_options_render_in_order() {
        let opts = TraceOptions {
            turd_size: Some(5),
            alpha_max: Some(0.5),
            opt_tolerance: Some(0.2),
            black_level: Some(0.4),
            invert: true,
        };
        assert_eq!(
            opts.to_args(),
            vec![
                "--turdsize",
                "5",
                "--alphamax",
                "0.5",
                "--opttolerance",
                "0.2",
                "--blacklevel",
                "0.4",
                "--invert"
            ]
        );
    }

    #[test]
    fn debug_hides_trait_objects() {
        let config = ConversionConfig::default();
        let dbg = format!("{config:?}");
        assert!(dbg.contains("keep_scratch"));
        assert!(dbg.contains("tracer: None"));
    }
}
