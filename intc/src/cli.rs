use std::{
    io::{IsTerminal, Write},
    time::Duration,
};
use intc_core::utils::prelude::Error;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

pub(crate) fn print_analyzing(text: &str) {
    print_colourful_prefix("Analyzing", Color::Magenta, text)
}

pub(crate) fn print_analyzed(duration: Duration) {
    print_colourful_prefix("Analyzed", Color::Green, &format!("in {}", seconds(duration)))
}

pub(crate) fn print_running(text: &str) {
    print_colourful_prefix("Running", Color::Cyan, text)
}

pub(crate) fn print_finished(duration: Duration, code: u8) {
    print_colourful_prefix(
        "Finished",
        Color::Green,
        &format!("in {} with exit code {code}", seconds(duration))
    )
}

pub fn seconds(duration: Duration) -> String {
    format!("{:.2}s", duration.as_millis() as f32 / 1000.)
}

pub fn print_colourful_prefix(prefix: &str, color: Color, text: &str) {
    let buffer_writer = stderr_buffer_writer();
    let mut buffer = buffer_writer.buffer();

    let written = buffer
        .set_color(
            ColorSpec::new()
                .set_intense(true)
                .set_bold(true)
                .set_fg(Some(color)),
        )
        .and_then(|_| write!(buffer, "{prefix: >11}"))
        .and_then(|_| buffer.set_color(&ColorSpec::new()))
        .and_then(|_| writeln!(buffer, " {text}"));

    // status lines are best effort, stderr may already be gone
    if written.is_ok() {
        let _ = buffer_writer.print(&buffer);
    }
}

pub fn print_error(error: &Error) {
    let buffer_writer = stderr_buffer_writer();
    let mut buffer = buffer_writer.buffer();

    match error.pretty(&mut buffer) {
        Ok(()) => {
            let _ = buffer_writer.print(&buffer);
        },
        Err(_) => eprintln!("{}", error.pretty_string())
    }
}

pub fn stderr_buffer_writer() -> BufferWriter {
    BufferWriter::stderr(color_choice())
}

fn colour_forced() -> bool {
    if let Ok(force) = std::env::var("FORCE_COLOR") {
        !force.is_empty()
    } else {
        false
    }
}

fn color_choice() -> ColorChoice {
    if colour_forced() {
        ColorChoice::Always
    } else if std::io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
