use ::log::{debug, error, info, LevelFilter};
use kindle::gapi::app::App as GraphicApp;
use kindle::gapi::vulkan::config::VulkanConfig;
use kindle::info_success;
use kindle::log::log::init_log;
use kindle::window::window::MyWindow;
use anyhow::Result;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> Result<()> {
    if let Err(err) = run() {
        report(&err);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    init_log()?;

    let event_loop = EventLoop::new()?;
    debug!("Creating Window...");
    let window = MyWindow::new(&event_loop)?;
    info_success!("Window Created!");

    let config = VulkanConfig::from_features();
    debug!("Creating App with {:?}", config);
    let mut app = Some(GraphicApp::new(&window, &config)?);
    info_success!("App Created!");

    // Set by the loop when it stops because of an error rather than a close request.
    let mut failure = None;

    // Nothing is drawn, so only wake up on window events.
    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop.run(|event, elwt| {
        if let Event::WindowEvent { event, .. } = event {
            match event {
                WindowEvent::Resized(size) => {
                    debug!("Window resized to {}x{}", size.width, size.height);
                    let rebuilt = app.as_mut().map_or(Ok(()), |app| app.resize(&window));
                    if let Err(err) = rebuilt {
                        app_teardown(&mut app);
                        failure = Some(err);
                        elwt.exit();
                    }
                }
                WindowEvent::CloseRequested => {
                    app_teardown(&mut app);
                    elwt.exit();
                }
                _ => {}
            }
        }
    })?;

    loop_outcome(failure)
}

/// Drops the app while the window it presents to is still alive.
fn app_teardown(app: &mut Option<GraphicApp>) {
    if app.take().is_some() {
        info!("App destroyed.");
    }
}

/// The result `run` hands back once the event loop has returned.
fn loop_outcome(failure: Option<anyhow::Error>) -> Result<()> {
    failure.map_or(Ok(()), Err)
}

/// The error followed by every cause, outermost first.
fn failure_report(err: &anyhow::Error) -> Vec<String> {
    std::iter::once(format!("Oops! Something went wrong: {}", err))
        .chain(err.chain().skip(1).map(|cause| format!("Caused by: {}", cause)))
        .collect()
}

/// Logs the report, or writes it to stderr if the logger never came up.
fn report(err: &anyhow::Error) {
    let logging = ::log::max_level() != LevelFilter::Off;
    for line in failure_report(err) {
        if logging {
            error!("{}", line);
        } else {
            eprintln!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn loop_error_reaches_the_caller() {
        let outcome = loop_outcome(Some(anyhow!("the surface reports no formats")));
        assert_eq!(
            outcome.unwrap_err().to_string(),
            "the surface reports no formats"
        );
    }

    #[test]
    fn closing_the_window_is_a_clean_exit() {
        assert!(loop_outcome(None).is_ok());
    }

    #[test]
    fn report_lists_every_cause() {
        let err = Err::<(), _>(anyhow!("no present modes"))
            .context("Failed to recreate swapchain.")
            .unwrap_err();
        assert_eq!(
            failure_report(&err),
            [
                "Oops! Something went wrong: Failed to recreate swapchain.",
                "Caused by: no present modes",
            ]
        );
    }
}
