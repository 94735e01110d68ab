//! counter - a four-button counter built with rebind.
//!
//! Each line read from stdin is treated as a click on the button with that
//! id: `back`, `inc`, `dec` or `jump`. `quit` exits.

use rebind::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

const APP: ViewId = ViewId(1);

/// Button id, label and how much it changes `num` by.
const BUTTONS: [(&str, &str, i64); 4] = [
    ("back", "Back by 5", -5),
    ("inc", "Increase", 1),
    ("dec", "Decrease", -1),
    ("jump", "Jump by 5", 5),
];

struct Counter;

impl View for Counter {
    fn render(&self, cx: &mut RenderCx<'_>) -> Result<(), RenderError> {
        let num = cx.get_as::<i64>("num")?;
        cx.line("<div>");
        cx.line(format_args!("  <h1>{num}</h1>"));
        for (id, label, _) in BUTTONS {
            cx.line(format_args!(r#"  <button id="{id}">{label}</button>"#));
        }
        cx.line("</div>");
        Ok(())
    }
}

fn print_output(runtime: &Runtime) {
    if let Some(output) = runtime.output(APP) {
        print!("{}", output.content());
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    rebind::init_tracing();

    let mut runtime = Runtime::new();
    runtime.mount(APP, [("num", 0)], Counter)?;
    for (id, _, delta) in BUTTONS {
        runtime.on_click(APP, id, move |state, _| {
            state.update_with::<i64>("num", |n| n + delta)
        })?;
    }
    print_output(&runtime);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let button = line.trim();
        match button {
            "" => continue,
            "quit" => break,
            _ => {}
        }

        match runtime.dispatch(APP, ClickEvent::new(button)) {
            Ok(_) => print_output(&runtime),
            Err(e) => tracing::warn!("{}", e),
        }
    }

    Ok(())
}
