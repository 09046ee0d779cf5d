//! Plain-text help rendering for the app and for individual commands.
//!
//! Pure presentation: padded two- and three-column tables, no markup. The
//! layout is a stable courtesy, not a machine-parseable contract.

use parley_core::Value;

use crate::app::App;
use crate::command::Command;

/// Renders the app-level help: name/version, description, usage line,
/// command list, and the further-help pointer.
pub(crate) fn app_help<C: 'static>(app: &App<C>) -> String {
    let s = app.strings();

    let version = match app.version() {
        Some(v) => format!(" v{v}"),
        None => String::new(),
    };

    let mut out = format!(
        "{name}{version}\n{desc}\n\n{usage}{prefix}{sep}{cmd}\n\n{list}\n\n",
        name = app.name(),
        desc = app.description(),
        usage = s.help_usage,
        prefix = app.prefix(),
        sep = app.separator(),
        cmd = s.help_command,
        list = s.help_cmd_list,
    );

    let rows: Vec<[String; 2]> = app
        .commands()
        .map(|c| [c.name().to_string(), c.description().to_string()])
        .collect();
    out.push_str(&columns2(&rows));

    out.push_str(&format!(
        "\n\n{further}{prefix} {cmd} --help",
        further = s.help_further_help,
        prefix = app.prefix(),
        cmd = s.help_command,
    ));

    out
}

/// Renders a command's help: usage line with `(required)` / `[optional]`
/// argument bracketing, description, argument and flag tables, and the
/// bracket legend.
pub(crate) fn command_help<C: 'static>(app: &App<C>, cmd: &Command<C>) -> String {
    let s = app.strings();

    let mut out = format!("{}{} {}", s.help_usage, app.prefix(), cmd.name());
    for arg in cmd.args() {
        if arg.is_required() {
            out.push_str(&format!(" ({})", arg.name()));
        } else {
            out.push_str(&format!(" [{}]", arg.name()));
        }
    }
    out.push('\n');
    out.push_str(cmd.description());

    if !cmd.args().is_empty() {
        let rows: Vec<[String; 3]> = cmd
            .args()
            .iter()
            .map(|a| {
                [
                    a.name().to_string(),
                    a.description().to_string(),
                    a.default_value().map(Value::to_string).unwrap_or_default(),
                ]
            })
            .collect();
        out.push_str(&format!("\n\n{}:\n\n{}", s.help_av_args, columns3(&rows)));
    }

    if !cmd.flags().is_empty() {
        let rows: Vec<[String; 3]> = cmd
            .flags()
            .iter()
            .map(|f| {
                let name = match f.alias() {
                    Some(alias) => format!("-{alias}, --{}", f.name()),
                    None => format!("--{}", f.name()),
                };
                [
                    name,
                    f.description().to_string(),
                    f.default_value().to_string(),
                ]
            })
            .collect();
        out.push_str(&format!(
            "\n\n{}:\n\n{}",
            s.help_av_options,
            columns3(&rows)
        ));
    }

    if !cmd.args().is_empty() {
        out.push_str(&format!("\n\n{}", s.help_args_required_optional));
    }

    out
}

fn columns2(rows: &[[String; 2]]) -> String {
    let width = rows.iter().map(|r| r[0].len()).max().unwrap_or(0);
    rows.iter()
        .map(|r| format!("{:width$}  {}", r[0], r[1]).trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn columns3(rows: &[[String; 3]]) -> String {
    let w0 = rows.iter().map(|r| r[0].len()).max().unwrap_or(0);
    let w1 = rows.iter().map(|r| r[1].len()).max().unwrap_or(0);
    rows.iter()
        .map(|r| {
            format!("{:w0$}  {:w1$}  {}", r[0], r[1], r[2])
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
