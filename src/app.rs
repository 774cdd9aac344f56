use anyhow::anyhow;
use slint::{ModelRc, SharedString, VecModel, Weak};
use std::time::Duration;
use stopwatch::stopwatch::Highlight;
use stopwatch::{observe, Engine, Handle, Observer, Snapshot};

slint::slint! {
import { Button, ListView } from "std-widgets.slint";

export struct LapRow {
    name: string,
    time: string,
    highlight: int,
}

export component MainWindow inherits Window {
    in property <string> readout: "00:00.00";
    in property <string> left-label: "Reset";
    in property <string> right-label: "Start";
    in property <[LapRow]> laps;

    callback left-pressed();
    callback right-pressed();

    preferred-width: 400px;
    preferred-height: 640px;
    title: "Stopwatch";
    background: #000000;

    VerticalLayout {
        padding: 16px;
        spacing: 12px;

        Text {
            text: root.readout;
            font-size: 70px;
            color: #ffffff;
            horizontal-alignment: center;
        }

        HorizontalLayout {
            alignment: center;
            spacing: 90px;

            Button {
                text: root.left-label;
                clicked => {
                    root.left-pressed();
                }
            }
            Button {
                text: root.right-label;
                clicked => {
                    root.right-pressed();
                }
            }
        }

        ListView {
            for lap in root.laps: HorizontalLayout {
                padding: 10px;

                Text {
                    text: lap.name;
                    font-size: 16px;
                    color: lap.highlight == 1 ? #29BA53 : (lap.highlight == 2 ? #E13B33 : #ffffff);
                }
                Text {
                    text: lap.time;
                    font-size: 16px;
                    horizontal-alignment: right;
                    color: lap.highlight == 1 ? #29BA53 : (lap.highlight == 2 ? #E13B33 : #ffffff);
                }
            }
        }
    }
}
}

/// Runs the window on this thread and the engine on a helper thread.
pub fn run(period: Duration) -> anyhow::Result<()> {
    let (engine, handle) = Engine::new(period);
    let window = MainWindow::new()?;

    window.on_left_pressed({
        let handle = handle.clone();
        move || press(&handle, stopwatch::Button::Left)
    });
    window.on_right_pressed({
        let handle = handle.clone();
        move || press(&handle, stopwatch::Button::Right)
    });

    let observer = WindowObserver(window.as_weak());
    let state = handle.subscribe();
    let worker = std::thread::spawn(move || -> anyhow::Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;

        runtime.block_on(async move {
            tokio::spawn(engine.run());
            observe(state, observer).await
        })
    });

    window.run()?;

    // Dropping the window releases the callbacks' handles, which shuts the engine down.
    drop(window);
    drop(handle);

    worker
        .join()
        .map_err(|_| anyhow!("The engine thread panicked"))?
}

fn press(handle: &Handle, button: stopwatch::Button) {
    if let Err(e) = handle.try_send(handle.command_for(button)) {
        tracing::error!(%e, ?button, "Failed to press the button");
    }
}

struct WindowObserver(Weak<MainWindow>);

impl Observer for WindowObserver {
    fn on_change(&mut self, snapshot: &Snapshot) {
        let snapshot = snapshot.clone();

        if let Err(e) = self.0.upgrade_in_event_loop(move |window| {
            window.set_readout(SharedString::from(snapshot.readout.as_str()));
            window.set_left_label(SharedString::from(stopwatch::Button::Left.label(snapshot.running)));
            window.set_right_label(SharedString::from(stopwatch::Button::Right.label(snapshot.running)));

            let rows: Vec<LapRow> = snapshot
                .laps
                .iter()
                .map(|lap| LapRow {
                    name: slint::format!("{lap}"),
                    time: SharedString::from(lap.display_time()),
                    highlight: match snapshot.highlight(lap) {
                        Some(Highlight::Fastest) => 1,
                        Some(Highlight::Slowest) => 2,
                        None => 0,
                    },
                })
                .collect();
            window.set_laps(ModelRc::new(VecModel::from(rows)));
        }) {
            tracing::error!(%e, "Failed to update the UI");
        }
    }
}
