//! Tracing setup. `LOG_LEVEL` takes `EnvFilter` directives; `LOG_FORMAT=json` switches to
//! structured output. Events use the `tasks` and `exercise_backend` targets.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,exercise_backend=debug,tower_http=info";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
  Pretty,
  Json,
}

impl LogFormat {
  fn parse(value: Option<&str>) -> Self {
    match value.map(str::trim) {
      Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
      _ => LogFormat::Pretty,
    }
  }
}

pub fn init_tracing() {
  let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
  let format = LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref());

  let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);
  match format {
    LogFormat::Json => subscriber.json().init(),
    LogFormat::Pretty => subscriber.init(),
  }
}
