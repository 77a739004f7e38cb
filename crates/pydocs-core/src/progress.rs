use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress bar for a per-item loop. Hidden when `visible` is false;
/// indicatif also stays silent when stderr is not a terminal.
pub fn item_bar(len: usize, label: &'static str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::with_draw_target(Some(len as u64), ProgressDrawTarget::hidden());
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{prefix} {wide_bar} {pos}/{len} [{elapsed_precise}<{eta}]")
    {
        bar.set_style(style);
    }
    bar.set_prefix(label);
    bar
}
