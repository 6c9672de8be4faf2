use chrono::NaiveDateTime;

pub type CmdResult<T> = korgi::Result<(T, i32)>;

/// Context shared by every command of one invocation.
pub(crate) struct GlobalArgs {
    /// Captured once at startup; names the run's working directory.
    pub started_at: NaiveDateTime,
}

pub mod apply;
pub mod config;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (korgi::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Apply(args) => dispatch!(args, global, apply),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}
