use transcriber_core::AppViewModel;

const BAR_WIDTH: usize = 24;

/// Draws the current view as terminal lines. The caller only invokes this
/// when the state is dirty, so repeated identical frames are not printed.
pub fn render(view: &AppViewModel) {
    if view.show_progress {
        println!(
            "{} {:>4}  {}",
            progress_bar(view.progress_percent),
            view.progress_label,
            view.step_message
        );
        return;
    }

    println!("{}", view.status_line);

    if view.show_result {
        if let Some(markdown) = &view.result_markdown {
            println!();
            println!("{markdown}");
        }
    }
}

/// Console analogue of a blocking alert dialog.
pub fn alert(message: &str) {
    eprintln!("ALERT: {message}");
}

fn progress_bar(percent: u8) -> String {
    let filled = (percent as usize * BAR_WIDTH) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
