//! Built-in commands.

use time::format_description::well_known::Rfc2822;
use time::OffsetDateTime;

use crate::content::{ABOUT_FILE, PROJECTS_DIR, SKILLS_FILE};
use crate::contact::{FormProgress, INTRO};
use crate::error::ShellError;
use crate::interpreter::registry::{Builtin, CommandContext, CommandRegistry, Effect};
use crate::render::{LineKind, OutputLine, Span, Style};
use crate::session::Mode;
use crate::vfs::{Directory, NodeKind, Vfs, VfsError, ROOT};

pub const WHOAMI: &str = "You are the operator. I am the machine.";
pub const HELP_HEADER: &str = "Available commands:";

/// Registry with every built-in, in `help` order.
pub fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register("help", Builtin::new("Show this help message.", help));
    registry.register("about", Builtin::new("Who is behind this terminal.", about));
    registry.register("projects", Builtin::new("List projects; select one to read it.", projects));
    registry.register("skills", Builtin::new("Languages and tools, by category.", skills));
    registry.register("contact", Builtin::new("Send a message.", contact));
    registry.register("ls", Builtin::new("List the current directory.", ls));
    registry.register("cd", Builtin::new("Change directory (.., ~, <dir>).", cd));
    registry.register("cat", Builtin::new("Print a file.", cat));
    registry.register("whoami", Builtin::new("Display user information.", whoami));
    registry.register("date", Builtin::new("Display the current system date.", date));
    registry.register("clear", Builtin::new("Clear the terminal screen.", clear));
    registry.register("reboot", Builtin::new("Restart the system.", reboot));
    registry.register("matrix", Builtin::new("Take the red pill.", matrix));
    registry
}

/// Local time, or UTC when the local offset cannot be determined.
pub fn system_clock() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn help(_: &str, ctx: &mut CommandContext<'_>) -> Result<Effect, ShellError> {
    let width = ctx
        .commands
        .summaries()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);

    let lines: Vec<OutputLine> = ctx
        .commands
        .summaries()
        .map(|(name, summary)| {
            OutputLine::new(
                LineKind::Preformatted,
                vec![
                    Span::plain("    "),
                    Span::styled(format!("{name:<width$}"), Style::Accent),
                    Span::plain(format!("  - {summary}")),
                ],
            )
        })
        .collect();

    ctx.print(HELP_HEADER);
    for line in lines {
        ctx.print_line(line);
    }
    Ok(Effect::None)
}

fn about(_: &str, ctx: &mut CommandContext<'_>) -> Result<Effect, ShellError> {
    let content = Vfs::get_file(ctx.vfs.root(), ABOUT_FILE)
        .map_err(|err| ShellError::from_vfs("about", ABOUT_FILE, err))?;
    ctx.print_line(OutputLine::preformatted(content));
    Ok(Effect::None)
}

fn projects(_: &str, ctx: &mut CommandContext<'_>) -> Result<Effect, ShellError> {
    let directory = ctx
        .vfs
        .root()
        .child(PROJECTS_DIR)
        .and_then(|node| node.as_directory())
        .ok_or_else(|| ShellError::NoSuchPath {
            command: "projects",
            target: format!("{ROOT}/{PROJECTS_DIR}"),
        })?;

    for (name, _) in Vfs::list_children(directory) {
        ctx.print_line(OutputLine::new(
            LineKind::Plain,
            vec![
                Span::styled("> ", Style::Dim),
                Span::action(name, format!("cat {ROOT}/{PROJECTS_DIR}/{name}")),
            ],
        ));
    }
    Ok(Effect::None)
}

fn skills(_: &str, ctx: &mut CommandContext<'_>) -> Result<Effect, ShellError> {
    let raw = Vfs::get_file(ctx.vfs.root(), SKILLS_FILE)
        .map_err(|err| ShellError::from_vfs("skills", SKILLS_FILE, err))?;
    let malformed = |reason: String| ShellError::MalformedContent {
        command: "skills",
        file: SKILLS_FILE,
        reason,
    };

    let categories: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(raw).map_err(|err| malformed(err.to_string()))?;

    let mut lines = Vec::with_capacity(categories.len());
    for (label, value) in &categories {
        let items = value
            .as_array()
            .ok_or_else(|| malformed(format!("'{label}' is not a list")))?
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| malformed(format!("'{label}' has a non-string entry")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        lines.push(
            OutputLine::styled(format!("{label}:"), Style::Accent)
                .with_span(Span::plain(format!(" {}", items.join(", ")))),
        );
    }

    for line in lines {
        ctx.print_line(line);
    }
    Ok(Effect::None)
}

fn contact(_: &str, ctx: &mut CommandContext<'_>) -> Result<Effect, ShellError> {
    ctx.state.mode = Mode::GuidedForm(FormProgress::new());
    ctx.print(INTRO);
    Ok(Effect::None)
}

fn ls(_: &str, ctx: &mut CommandContext<'_>) -> Result<Effect, ShellError> {
    let cwd = current_dir(ctx, "ls")?;
    let mut spans = Vec::with_capacity(cwd.len() * 2);
    for (name, kind) in Vfs::list_children(cwd) {
        if !spans.is_empty() {
            spans.push(Span::plain("  "));
        }
        spans.push(match kind {
            NodeKind::Directory => Span::styled(format!("{name}/"), Style::Directory),
            NodeKind::File => Span::plain(name),
        });
    }
    if !spans.is_empty() {
        ctx.print_line(OutputLine::new(LineKind::Plain, spans));
    }
    Ok(Effect::None)
}

fn cd(argument: &str, ctx: &mut CommandContext<'_>) -> Result<Effect, ShellError> {
    let target = argument.strip_suffix('/').unwrap_or(argument);
    match target {
        "" | ROOT => {
            ctx.state.path = Default::default();
        }
        ".." => {
            ctx.state.path.pop();
        }
        name => {
            let is_child_dir = !name.contains('/')
                && current_dir(ctx, "cd")?
                    .child(name)
                    .is_some_and(|node| node.kind() == NodeKind::Directory);
            if !is_child_dir {
                return Err(ShellError::NoSuchPath {
                    command: "cd",
                    target: argument.to_string(),
                });
            }
            ctx.state.path.push(name);
        }
    }
    Ok(Effect::None)
}

fn cat(argument: &str, ctx: &mut CommandContext<'_>) -> Result<Effect, ShellError> {
    if argument.is_empty() {
        return Err(ShellError::MissingOperand { command: "cat" });
    }

    let relative = argument.strip_suffix('/').unwrap_or(argument);
    let (base, relative) = match relative.strip_prefix(ROOT) {
        Some("") => {
            return Err(ShellError::IsADirectory {
                command: "cat",
                target: argument.to_string(),
            })
        }
        Some(rest) if rest.starts_with('/') => (ctx.vfs.root(), &rest[1..]),
        _ => (current_dir(ctx, "cat")?, relative),
    };

    let content = read_file(base, relative)
        .map_err(|err| ShellError::from_vfs("cat", argument, err))?;
    ctx.print_line(OutputLine::preformatted(content));
    Ok(Effect::None)
}

/// `name` or `dir/name` below `base`.
fn read_file<'a>(base: &'a Directory, relative: &str) -> Result<&'a str, VfsError> {
    let not_found = || VfsError::NotFound {
        name: relative.to_string(),
    };
    match relative.split_once('/') {
        None => Vfs::get_file(base, relative),
        Some((dir, name)) if !name.contains('/') => {
            let directory = base
                .child(dir)
                .and_then(|node| node.as_directory())
                .ok_or_else(not_found)?;
            Vfs::get_file(directory, name)
        }
        Some(_) => Err(not_found()),
    }
}

fn whoami(_: &str, ctx: &mut CommandContext<'_>) -> Result<Effect, ShellError> {
    ctx.print(WHOAMI);
    Ok(Effect::None)
}

fn date(_: &str, ctx: &mut CommandContext<'_>) -> Result<Effect, ShellError> {
    let now = (ctx.clock)();
    let formatted = now.format(&Rfc2822).unwrap_or_else(|_| now.to_string());
    ctx.print(formatted);
    Ok(Effect::None)
}

fn clear(_: &str, ctx: &mut CommandContext<'_>) -> Result<Effect, ShellError> {
    ctx.out.clear();
    Ok(Effect::None)
}

fn reboot(_: &str, _: &mut CommandContext<'_>) -> Result<Effect, ShellError> {
    Ok(Effect::Reboot)
}

fn matrix(_: &str, _: &mut CommandContext<'_>) -> Result<Effect, ShellError> {
    Ok(Effect::Matrix)
}

fn current_dir<'a>(
    ctx: &CommandContext<'a>,
    command: &'static str,
) -> Result<&'a Directory, ShellError> {
    let vfs: &'a Vfs = ctx.vfs;
    vfs.resolve_dir(&ctx.state.path)
        .map_err(|_| ShellError::NoSuchPath {
            command,
            target: ctx.state.path.to_string(),
        })
}
