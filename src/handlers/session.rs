use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::console::{self, Flow, Input};
use crate::models::Tone;
use crate::state::AppState;
use crate::view::render::{paint, render_drawer, render_table, render_turn};
use crate::view::{Action, Speaker, ViewState};

/// Drives the console until `/quit` or end of input. A line that is not UTF-8
/// becomes a warning turn and the loop keeps going.
pub async fn run<R, W>(
    state: &AppState,
    view: &mut ViewState,
    mut reader: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut buf = Vec::new();
    let mut printed = view.transcript.len();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let (show_table, show_drawer) = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let input = console::parse_input(line);
                // Page moves always redraw; a reload only after it succeeded.
                let page_move = matches!(input, Input::NextPage | Input::PrevPage);
                let reload = matches!(input, Input::ListBookings);
                let drawer = matches!(input, Input::ToggleDrawer | Input::ListBookings);

                if console::handle_input(state, view, input).await == Flow::Quit {
                    break;
                }
                (page_move || (reload && view.last_error.is_none()), drawer)
            }
            Err(e) => {
                tracing::warn!(error = %e, "ignoring input line that is not valid UTF-8");
                view.apply(Action::Notice(
                    Tone::Warning,
                    "That line was not valid UTF-8 and was ignored.".to_string(),
                ));
                (false, false)
            }
        };

        let now = chrono::Utc::now();
        for turn in &view.transcript[printed..] {
            for line in render_turn(turn, now) {
                match turn.speaker {
                    Speaker::User => writeln!(out, "{line}")?,
                    Speaker::Assistant => writeln!(out, "{}", paint(view.theme, turn.tone, &line))?,
                }
            }
        }
        printed = view.transcript.len();

        if show_table {
            for line in render_table(view, now) {
                writeln!(out, "{line}")?;
            }
        }
        if show_drawer && view.drawer_open {
            for line in render_drawer(view, now) {
                writeln!(out, "{line}")?;
            }
        }
        out.flush()?;
    }

    Ok(())
}
