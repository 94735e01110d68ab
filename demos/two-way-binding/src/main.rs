//! two-way-binding - a controlled text input and a form that resets it.
//!
//! Commands, one per line on stdin:
//!
//! - `type <text>`: the input now contains `<text>` (a change event)
//! - `key <name>`: a key was pressed in the input (logged only)
//! - `submit`: submit the form, which logs the name and clears the input
//! - `quit`: exit

use rebind::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

const APP: ViewId = ViewId(1);
const INPUT: &str = "name-input";
const FORM: &str = "name-form";

struct NameForm {
    placeholder: &'static str,
}

impl View for NameForm {
    fn render(&self, cx: &mut RenderCx<'_>) -> Result<(), RenderError> {
        let title = cx.bind_display(INPUT, "title")?;
        cx.line(format_args!(r#"<form id="{FORM}">"#));
        cx.line(format_args!(
            r#"  <input id="{INPUT}" type="text" placeholder="{}" value="{}">"#,
            escape_html(self.placeholder),
            escape_html(&title.to_string())
        ));
        cx.line("  <button>Submit</button>");
        cx.line("</form>");
        Ok(())
    }
}

fn print_output(runtime: &Runtime) {
    if let Some(output) = runtime.output(APP) {
        print!("{}", output.content());
    }
}

fn parse(line: &str) -> Option<UiEvent> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    match command {
        "type" => Some(ChangeEvent::new(INPUT, "title", rest).into()),
        "key" => Some(KeyEvent::new(INPUT, rest).into()),
        "submit" => Some(SubmitEvent::new(FORM).into()),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    rebind::init_tracing();

    let mut runtime = Runtime::with_config(RuntimeConfig::new().with_log_outputs(true));
    runtime.mount(
        APP,
        [("title", "")],
        NameForm {
            placeholder: "Enter your name",
        },
    )?;
    runtime.on_key(APP, INPUT, |event| {
        tracing::info!("key pressed: {}", event.key);
    })?;
    runtime.on_submit(APP, FORM, |state, _| {
        let title = state.get_as::<String>("title")?;
        tracing::info!("Form submitted by {}", title);
        state.set("title", "")
    })?;
    print_output(&runtime);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "quit" {
            break;
        }
        let Some(event) = parse(&line) else {
            tracing::warn!("unknown command: {}", line);
            continue;
        };

        match runtime.dispatch(APP, event) {
            Ok(Some(_)) => print_output(&runtime),
            Ok(None) => {}
            Err(e) => tracing::warn!("{}", e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_commands() {
        assert_eq!(
            parse("type Abhishek"),
            Some(ChangeEvent::new(INPUT, "title", "Abhishek").into())
        );
        assert_eq!(parse("type"), Some(ChangeEvent::new(INPUT, "title", "").into()));
        assert_eq!(parse("key Enter"), Some(KeyEvent::new(INPUT, "Enter").into()));
        assert_eq!(parse("submit"), Some(SubmitEvent::new(FORM).into()));
        assert_eq!(parse("dance"), None);
    }
}
