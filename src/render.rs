//! Rendering resolved services as JSON or through a template.
//!
//! Templates use [`minijinja`] syntax. The resolved services are available
//! as `records`, a mapping from alias to a list of services, each with the
//! attributes `Host`, `FQDN`, `IP` and `Port`. For example, the built-in
//! default template is
//!
//! ```text
//! {% for alias, services in records|items %}{% for srv in services %}{{ srv.Host }}:{{ srv.Port }}
//! {% endfor %}{% endfor %}
//! ```

use crate::{Error, Records};
use minijinja::{context, Environment, UndefinedBehavior};
use std::{
    borrow::Cow,
    io::{Read, Write},
    path::{Path, PathBuf},
};

/// Template printing one `host:port` line per service.
pub const DEFAULT_TEMPLATE: &str = "{% for alias, services in records|items %}\
{% for srv in services %}{{ srv.Host }}:{{ srv.Port }}\n{% endfor %}{% endfor %}";

/// Template printing `ALIAS_ADDRi`, `ALIAS_HOSTi` and `ALIAS_PORTi` variable
/// assignments for the i-th service of each alias.
pub const ENV_TEMPLATE: &str = "{% for alias, services in records|items %}\
{% for srv in services %}\
{{ alias }}_ADDR{{ loop.index0 }}={{ srv.Host }}:{{ srv.Port }}\n\
{{ alias }}_HOST{{ loop.index0 }}={{ srv.Host }}\n\
{{ alias }}_PORT{{ loop.index0 }}={{ srv.Port }}\n\
{% endfor %}{% endfor %}";

const TEMPLATE_NAME: &str = "output";

/// Where a template's body comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateSource {
    /// Read from standard input.
    Stdin,
    /// Read from a file.
    File(PathBuf),
    /// [`DEFAULT_TEMPLATE`].
    Default,
    /// [`ENV_TEMPLATE`].
    Env,
}

impl TemplateSource {
    /// Gets the template body, reading it if it is not built in.
    pub fn load(&self) -> Result<Cow<'static, str>, Error> {
        match self {
            Self::Stdin => {
                let mut body = String::new();
                std::io::stdin()
                    .read_to_string(&mut body)
                    .map_err(Error::TemplateLoad)?;
                Ok(Cow::Owned(body))
            }
            Self::File(path) => std::fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(Error::TemplateLoad),
            Self::Default => Ok(Cow::Borrowed(DEFAULT_TEMPLATE)),
            Self::Env => Ok(Cow::Borrowed(ENV_TEMPLATE)),
        }
    }
}

/// How resolved services are written out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// A single JSON object.
    Json,
    /// A rendered template.
    Template(TemplateSource),
}

impl OutputMode {
    /// Picks the output mode from the command line options.
    ///
    /// JSON wins over everything else. Otherwise an explicit template path
    /// (`-` meaning standard input) comes first, then the environment
    /// template if `env` is set, then the default template. An empty path
    /// counts as no path.
    pub fn select(template: Option<&Path>, env: bool, json: bool) -> Self {
        if json {
            return Self::Json;
        }
        let source = match template.filter(|path| !path.as_os_str().is_empty()) {
            Some(path) if path == Path::new("-") => TemplateSource::Stdin,
            Some(path) => TemplateSource::File(path.to_path_buf()),
            None if env => TemplateSource::Env,
            None => TemplateSource::Default,
        };
        Self::Template(source)
    }
}

/// Renders [`Records`] in a chosen [`OutputMode`].
///
/// Templates are loaded and compiled on construction, so that a broken
/// template is reported before any lookup happens.
#[derive(Debug)]
pub struct Renderer {
    // `None` in JSON mode.
    env: Option<Environment<'static>>,
}

impl Renderer {
    /// Prepares a renderer, loading and compiling its template if needed.
    pub fn new(mode: OutputMode) -> Result<Self, Error> {
        match mode {
            OutputMode::Json => Ok(Self { env: None }),
            OutputMode::Template(source) => Self::from_template(source.load()?),
        }
    }

    /// Prepares a renderer for a template body.
    pub fn from_template(body: impl Into<Cow<'static, str>>) -> Result<Self, Error> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template_owned(TEMPLATE_NAME, body.into())
            .map_err(Error::TemplateParse)?;
        Ok(Self { env: Some(env) })
    }

    /// Writes `records` to `out`.
    pub fn render(&self, records: &Records, mut out: impl Write) -> Result<(), Error> {
        let rendered = match &self.env {
            None => {
                let mut json = serde_json::to_vec(records)?;
                json.push(b'\n');
                json
            }
            Some(env) => env
                .get_template(TEMPLATE_NAME)
                .and_then(|template| template.render(context! { records }))
                .map_err(Error::TemplateRender)?
                .into_bytes(),
        };
        out.write_all(&rendered)
            .and_then(|()| out.flush())
            .map_err(Error::Output)
    }
}
