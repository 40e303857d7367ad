mod config;
mod renderer;

use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::SyncSender,
    },
    time::Duration,
};

use crossterm::{
    ExecutableCommand, cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

pub use config::{Cli, Config, SolverChoice};
pub use renderer::{Renderer, RendererStatus};

use crate::{
    generators::{GenerationRun, generate_maze},
    maze::{GridEvent, Maze},
    solvers::{SearchOutcome, SearchRun, SearchStep, Solver, solve_maze},
};

/// Messages from the compute thread to the render thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Grid(GridEvent),
    /// Replaces the status line below the maze
    Status(String),
    /// Keeps the current frame on screen for a while
    Hold(Duration),
}

impl From<GridEvent> for AppEvent {
    fn from(event: GridEvent) -> Self {
        AppEvent::Grid(event)
    }
}

/// Maximum number of events to buffer in the channel between compute and render threads
const MAX_EVENTS_IN_CHANNEL_BUFFER: usize = 1000;
/// How often the input thread checks for render done/cancel flags
const USER_INPUT_EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);
/// How long a finished search stays on screen before the next solver starts
const HOLD_BETWEEN_SOLVERS: Duration = Duration::from_millis(1500);

/// Set a panic hook to restore terminal state on panic
/// This ensures that the terminal is not left in raw mode or alternate screen on panic
/// even if the panic occurs in a different thread
fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
        hook(panic_info);
    }));
}

/// Setup terminal in raw mode and enter alternate screen
/// Also sets a panic hook to restore terminal on panic
pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    set_panic_hook();
    queue!(
        stdout,
        terminal::EnterAlternateScreen,
        terminal::Clear(ClearType::All),
        cursor::Hide,
        cursor::MoveTo(0, 0)
    )?;
    stdout.flush()?;
    Ok(())
}

/// Restore terminal to original state
/// Leave alternate screen and disable raw mode
pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
    stdout.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// Status line text for a finished search.
fn describe_outcome(solver: Solver, outcome: &SearchOutcome) -> String {
    match &outcome.path {
        Some(path) => format!(
            "{}: path of {} cells, {} cells explored",
            solver,
            path.len(),
            outcome.visited_count
        ),
        None => format!(
            "{}: no path found, {} cells explored",
            solver, outcome.visited_count
        ),
    }
}

/// Animated mode: draws generation and every requested search in the terminal.
/// Expects the terminal to be set up with [`setup_terminal`].
pub fn run(config: &Config, stdout: &mut Stdout) -> std::io::Result<()> {
    if !terminal_fits(stdout, config.width, config.height)? {
        return Ok(());
    }

    // Flag to indicate rendering is done. Set to true by the render thread when it finishes.
    let render_done = Arc::new(AtomicBool::new(false));
    // Flag to indicate rendering should be cancelled. Set to true by the input thread on Esc.
    let render_cancel = Arc::new(AtomicBool::new(false));

    let render_done_for_input = render_done.clone();
    let render_cancel_for_input = render_cancel.clone();
    // Spawn a thread to listen for user input
    let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
        listen_to_user_input(
            USER_INPUT_EVENT_POLL_TIMEOUT,
            &render_done_for_input,
            &render_cancel_for_input,
        )
    });

    let (event_tx, event_rx) = std::sync::mpsc::sync_channel::<AppEvent>(MAX_EVENTS_IN_CHANNEL_BUFFER);

    // Spawn a thread to listen for grid updates and render the maze
    let delay = config.delay;
    let render_cancel_for_render = render_cancel.clone();
    let render_done_for_render = render_done.clone();
    let render_thread_handle = std::thread::spawn(move || {
        let mut renderer = Renderer::new(delay);
        renderer.render(event_rx, &render_cancel_for_render, &render_done_for_render)
    });

    // Spawn a thread to generate the maze and solve it
    let compute_config = config.clone();
    let render_cancel_for_compute = render_cancel.clone();
    let compute_thread_handle = std::thread::spawn(move || {
        compute(&compute_config, event_tx, &render_cancel_for_compute)
    });

    // Wait for compute thread to finish
    let results = compute_thread_handle
        .join()
        .expect("Compute thread panicked");

    // Wait for render thread to finish
    let completed = render_thread_handle
        .join()
        .expect("Render thread panicked")?;

    // Wait for input thread to finish
    let _ = input_thread_handle.join();

    if let RendererStatus::Cancelled = completed {
        tracing::info!("Rendering was cancelled by user.");
        return Ok(());
    }

    for (solver, outcome) in &results {
        stdout.execute(style::PrintStyledContent(
            format!("{}\r\n", describe_outcome(*solver, outcome))
                .with(Color::Green)
                .attribute(Attribute::Bold),
        ))?;
    }
    stdout.execute(style::PrintStyledContent(
        "Press Esc to exit...\r\n"
            .with(Color::Blue)
            .attribute(Attribute::Bold),
    ))?;
    // Wait for user to press Esc
    wait_for_esc()?;
    Ok(())
}

/// Checks that the maze fits the terminal. If not, explains why and waits for Esc.
fn terminal_fits(stdout: &mut Stdout, width: u8, height: u8) -> std::io::Result<bool> {
    let (needed_width, needed_height) = Renderer::required_size(width, height);
    let (term_width, term_height) = terminal::size()?;
    if term_width >= needed_width && term_height >= needed_height {
        return Ok(true);
    }
    let msg = format!(
        "Terminal size is too small ({}x{}) for a {}x{} maze, which needs {}x{}. Please resize the terminal.\r\n",
        term_width, term_height, width, height, needed_width, needed_height
    );
    queue!(
        stdout,
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold)),
        style::PrintStyledContent(
            "Press Esc to exit...\r\n"
                .with(Color::Blue)
                .attribute(Attribute::Bold)
        )
    )?;
    stdout.flush()?;
    wait_for_esc()?;
    Ok(false)
}

/// Generate the maze, then run each configured solver on it.
/// Returns the outcome of every search that finished before cancellation.
fn compute(
    config: &Config,
    event_tx: SyncSender<AppEvent>,
    cancel: &AtomicBool,
) -> Vec<(Solver, SearchOutcome)> {
    let status_tx = event_tx.clone();
    let status = |text: String| {
        // Render thread may have exited already
        status_tx.send(AppEvent::Status(text)).ok();
    };
    let cancelled = || cancel.load(Ordering::Relaxed);

    let mut maze = Maze::with_sink(config.width, config.height, event_tx);
    status(format!("GENERATING {}x{} MAZE", config.width, config.height));
    tracing::info!(
        "[compute] generating {}x{} maze (seed: {:?})",
        config.width,
        config.height,
        config.seed
    );
    let mut generation = GenerationRun::new(maze.start(), config.seed);
    while !generation.advance(&mut maze) {
        if cancelled() {
            tracing::info!("[compute] cancelled during generation");
            return Vec::new();
        }
        status(format!(
            "GENERATING {}x{} MAZE | AT {:?} | BACKTRACK DEPTH: {}",
            config.width,
            config.height,
            generation.current(),
            generation.stack().len()
        ));
    }

    let mut results = Vec::new();
    for &solver in &config.solvers {
        maze.reset_search();
        let mut run = SearchRun::new(solver, maze.start(), maze.goal());
        let outcome = loop {
            if cancelled() {
                tracing::info!("[compute] cancelled while running {}", solver);
                return results;
            }
            match run.advance(&mut maze) {
                SearchStep::Running => status(format!(
                    "RUNNING: {} | CELLS EXPLORED: {}",
                    solver,
                    run.visited_count()
                )),
                SearchStep::Done(outcome) => break outcome,
            }
        };
        tracing::info!("[compute] {}", describe_outcome(solver, &outcome));
        status(describe_outcome(solver, &outcome));
        status_tx.send(AppEvent::Hold(HOLD_BETWEEN_SOLVERS)).ok();
        results.push((solver, outcome));
    }
    results
    // Maze is dropped here, as well as the event senders
}

/// Listen for the Esc key until rendering is done or cancelled.
/// This function runs in a separate thread, and is the only place where user input is read
fn listen_to_user_input(
    event_poll_timeout: Duration,
    render_done: &AtomicBool,
    render_cancel: &AtomicBool,
) -> std::io::Result<()> {
    loop {
        // Check if render is done or canceled
        if render_done.load(Ordering::Relaxed) || render_cancel.load(Ordering::Relaxed) {
            return Ok(());
        }

        // Poll for events with a timeout
        if !event::poll(event_poll_timeout)? {
            continue;
        }

        if let event::Event::Key(event::KeyEvent {
            code: KeyCode::Esc,
            kind: event::KeyEventKind::Press,
            ..
        }) = event::read()?
        {
            tracing::debug!("[input loop] Esc key pressed, cancelling");
            render_cancel.store(true, Ordering::Relaxed);
            return Ok(());
        }
    }
}

/// Wait for the user to press the Esc key
/// This function blocks until Esc is pressed
fn wait_for_esc() -> std::io::Result<()> {
    loop {
        if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
            if code == KeyCode::Esc && kind == event::KeyEventKind::Press {
                break;
            }
        }
    }
    Ok(())
}

/// Headless mode: generate and solve without drawing, then print one line per solver.
pub fn run_headless<W: Write>(config: &Config, out: &mut W) -> std::io::Result<()> {
    let mut maze = Maze::new(config.width, config.height);
    let steps = generate_maze(&mut maze, config.seed);
    writeln!(
        out,
        "Generated {}x{} maze in {} steps",
        config.width, config.height, steps
    )?;
    for &solver in &config.solvers {
        let outcome = solve_maze(&mut maze, solver);
        writeln!(out, "{}", describe_outcome(solver, &outcome))?;
    }
    Ok(())
}

/// Profiling mode: generate and solve with every solver repeatedly, discarding all
/// grid events on a background thread instead of drawing them.
pub fn profile(width: u8, height: u8, num_iterations: Option<usize>) -> std::io::Result<()> {
    let (event_tx, event_rx) = std::sync::mpsc::sync_channel::<AppEvent>(MAX_EVENTS_IN_CHANNEL_BUFFER);

    // Spawn a thread to drain grid updates
    let drain_thread_handle = std::thread::spawn(move || event_rx.iter().count());

    let compute_thread_handle = std::thread::spawn(move || {
        for iteration in 0..num_iterations.unwrap_or(1) {
            let mut maze = Maze::with_sink(width, height, event_tx.clone());
            generate_maze(&mut maze, None);
            for solver in Solver::ALL {
                let outcome = solve_maze(&mut maze, solver);
                tracing::debug!(
                    "[profile] iteration {}: {}",
                    iteration,
                    describe_outcome(solver, &outcome)
                );
            }
        }
    });

    // Wait for compute thread to finish
    compute_thread_handle
        .join()
        .expect("Compute thread panicked");

    // Wait for drain thread to finish
    let num_events = drain_thread_handle.join().expect("Drain thread panicked");
    tracing::info!("[profile] {} grid events emitted", num_events);

    Ok(())
}
