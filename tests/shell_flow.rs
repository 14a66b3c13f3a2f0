mod support;

use pretty_assertions::assert_eq;

use ofo_shell::contact::CANCELLED;
use ofo_shell::{Key, KeyEvent, Mode, VfsPath, MATRIX_DURATION};
use support::{buffer, enter_line, press, ready_shell, unbooted_shell, CountingCue, RecordingSubmitter, PROMPT};

#[tokio::test(start_paused = true)]
async fn empty_input_echoes_only_the_prompt() {
    let mut shell = ready_shell(RecordingSubmitter::succeeding());
    enter_line(&mut shell, "").await;
    enter_line(&mut shell, "   ").await;

    assert_eq!(shell.surface().texts(), vec![PROMPT, PROMPT]);
    assert!(shell.state().history.entries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn whoami_prints_its_fixed_line() {
    let mut shell = ready_shell(RecordingSubmitter::succeeding());
    enter_line(&mut shell, "whoami").await;

    assert_eq!(
        shell.surface().texts(),
        vec![
            format!("{PROMPT} whoami"),
            "You are the operator. I am the machine.".to_string(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn unknown_command_reports_the_raw_input() {
    let mut shell = ready_shell(RecordingSubmitter::succeeding());
    enter_line(&mut shell, "sudo rm -rf /").await;

    assert_eq!(
        shell.surface().texts(),
        vec![
            format!("{PROMPT} sudo rm -rf /"),
            "bash: command not found: sudo rm -rf /".to_string(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn clear_removes_every_line_including_its_echo() {
    let mut shell = ready_shell(RecordingSubmitter::succeeding());
    enter_line(&mut shell, "whoami").await;
    enter_line(&mut shell, "clear").await;

    assert!(shell.surface().texts().is_empty());

    press(&mut shell, Key::Char('x')).await;
    press(&mut shell, Key::ClearScreen).await;
    assert_eq!(shell.surface().clear_count(), 2);
    assert_eq!(buffer(&shell), "x");
}

#[tokio::test(start_paused = true)]
async fn help_lists_every_command() {
    let mut shell = ready_shell(RecordingSubmitter::succeeding());
    enter_line(&mut shell, "help").await;

    let texts = shell.surface().texts();
    assert_eq!(texts[0], format!("{PROMPT} help"));
    assert_eq!(texts[1], "Available commands:");
    let names: Vec<String> = texts[2..]
        .iter()
        .filter_map(|line| line.split_whitespace().next().map(str::to_string))
        .collect();
    assert_eq!(
        names,
        vec![
            "help", "about", "projects", "skills", "contact", "ls", "cd", "cat", "whoami",
            "date", "clear", "reboot", "matrix",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn prompt_tracks_the_working_directory() {
    let mut shell = ready_shell(RecordingSubmitter::succeeding());
    enter_line(&mut shell, "cd projects").await;
    assert_eq!(shell.state().path, VfsPath::from_segments(["projects"]));
    assert_eq!(
        shell.surface().prompt().map(|prompt| prompt.prompt.as_str()),
        Some("operator@owenofarrell:~/projects$")
    );

    enter_line(&mut shell, "cd ..").await;
    enter_line(&mut shell, "cd ..").await;
    assert!(shell.state().path.is_root());
    assert_eq!(
        shell.surface().texts().last().map(String::as_str),
        Some("operator@owenofarrell:~$ cd ..")
    );
}

#[tokio::test(start_paused = true)]
async fn history_walks_back_and_forward() {
    let mut shell = ready_shell(RecordingSubmitter::succeeding());
    for line in ["A", "B", "C"] {
        enter_line(&mut shell, line).await;
    }

    let mut seen = Vec::new();
    for _ in 0..3 {
        press(&mut shell, Key::Up).await;
        seen.push(buffer(&shell).to_string());
    }
    assert_eq!(seen, vec!["C", "B", "A"]);

    press(&mut shell, Key::Up).await;
    assert_eq!(buffer(&shell), "A");

    press(&mut shell, Key::Down).await;
    assert_eq!(buffer(&shell), "B");
    press(&mut shell, Key::Down).await;
    press(&mut shell, Key::Down).await;
    assert_eq!(buffer(&shell), "");
    assert_eq!(shell.state().history.cursor(), None);
}

#[tokio::test(start_paused = true)]
async fn live_prompt_mirrors_the_edit_buffer() {
    let mut shell = ready_shell(RecordingSubmitter::succeeding());
    for ch in "lsx".chars() {
        press(&mut shell, Key::Char(ch)).await;
    }
    press(&mut shell, Key::Backspace).await;

    let prompt = shell.surface().prompt().expect("prompt is shown");
    assert_eq!(prompt.prompt, PROMPT);
    assert_eq!(prompt.buffer, "ls");
}

#[tokio::test(start_paused = true)]
async fn interrupt_clears_a_pending_line_then_requests_exit() {
    let mut shell = ready_shell(RecordingSubmitter::succeeding());
    press(&mut shell, Key::Char('w')).await;
    press(&mut shell, Key::Char('h')).await;
    press(&mut shell, Key::Interrupt).await;

    assert_eq!(shell.surface().texts(), vec![format!("{PROMPT} wh^C")]);
    assert_eq!(buffer(&shell), "");
    assert!(!shell.exit_requested());

    press(&mut shell, Key::Interrupt).await;
    assert!(shell.exit_requested());
}

#[tokio::test(start_paused = true)]
async fn end_of_input_exits_only_on_an_empty_line() {
    let mut shell = ready_shell(RecordingSubmitter::succeeding());
    press(&mut shell, Key::Char('l')).await;
    press(&mut shell, Key::EndOfInput).await;
    assert!(!shell.exit_requested());

    press(&mut shell, Key::Backspace).await;
    press(&mut shell, Key::EndOfInput).await;
    assert!(shell.exit_requested());
}

#[tokio::test(start_paused = true)]
async fn activating_a_project_link_runs_it_as_typed() {
    let mut shell = ready_shell(RecordingSubmitter::succeeding());
    enter_line(&mut shell, "projects").await;

    let command = shell
        .surface()
        .lines()
        .flat_map(|line| line.actions().map(str::to_string).collect::<Vec<_>>())
        .next()
        .expect("projects prints links");
    shell.activate(&command).await;

    let texts = shell.surface().texts();
    let echo_index = texts
        .iter()
        .position(|line| *line == format!("{PROMPT} {command}"))
        .expect("activation is echoed");
    assert!(texts[echo_index + 1].starts_with("ofo-shell"));
    assert_eq!(
        shell.state().history.entries().last(),
        Some(&command)
    );
}

#[tokio::test(start_paused = true)]
async fn activating_a_link_during_the_contact_form_cancels_it_first() {
    let mut shell = ready_shell(RecordingSubmitter::succeeding());
    enter_line(&mut shell, "contact").await;
    press(&mut shell, Key::Char('A')).await;

    let command = "cat ~/projects/ofo-shell.txt";
    shell.activate(command).await;

    assert_eq!(shell.state().mode, Mode::Normal);
    assert!(shell.submitter().submissions().is_empty());
    let texts = shell.surface().texts();
    let cancelled = texts
        .iter()
        .position(|line| line == CANCELLED)
        .expect("form is cancelled");
    assert_eq!(texts[cancelled + 1], format!("{PROMPT} {command}"));
    assert!(texts[cancelled + 2].starts_with("ofo-shell"));
    assert!(texts.iter().all(|line| !line.starts_with("Name: cat")));
    assert_eq!(
        shell.surface().prompt().map(|prompt| prompt.prompt.as_str()),
        Some(PROMPT)
    );
}

#[tokio::test(start_paused = true)]
async fn matrix_hides_output_until_its_timer_fires() {
    let mut shell = ready_shell(RecordingSubmitter::succeeding());
    let started = tokio::time::Instant::now();
    enter_line(&mut shell, "matrix").await;

    assert!(!shell.surface().is_visible());
    assert_eq!(shell.next_deadline(), Some(started + MATRIX_DURATION));

    tokio::time::advance(MATRIX_DURATION / 2).await;
    shell.run_due(tokio::time::Instant::now());
    assert!(!shell.surface().is_visible());

    tokio::time::advance(MATRIX_DURATION / 2).await;
    shell.run_due(tokio::time::Instant::now());
    assert!(shell.surface().is_visible());
    assert_eq!(shell.next_deadline(), None);
}

#[tokio::test(start_paused = true)]
async fn keys_are_dropped_until_boot_enables_input() {
    let mut shell = unbooted_shell(RecordingSubmitter::succeeding());
    press(&mut shell, Key::Char('l')).await;
    press(&mut shell, Key::Enter).await;

    assert_eq!(buffer(&shell), "");
    assert!(shell.surface().texts().is_empty());
    assert!(shell.surface().prompt().is_none());
}

#[tokio::test(start_paused = true)]
async fn reboot_clears_and_replays_the_boot_sequence() {
    let mut shell = ready_shell(RecordingSubmitter::succeeding());
    enter_line(&mut shell, "whoami").await;
    enter_line(&mut shell, "reboot").await;

    let expected: Vec<&str> = ofo_shell::BOOT_LINES.iter().map(|line| line.text).collect();
    assert_eq!(shell.surface().texts(), expected);
    assert_eq!(shell.enable_count(), 2);
    assert_eq!(shell.boot_count(), 2);
    assert!(shell.input_enabled());
}

#[tokio::test(start_paused = true)]
async fn typed_characters_click_unless_repeated() {
    let cue = CountingCue::default();
    let mut shell = ready_shell(RecordingSubmitter::succeeding()).with_sound(Box::new(cue.clone()));

    shell.handle_key(KeyEvent::press(Key::Char('a'))).await;
    shell.handle_key(KeyEvent::repeat(Key::Char('a'))).await;
    shell.handle_key(KeyEvent::repeat(Key::Char('a'))).await;

    assert_eq!(cue.clicks(), 1);
    assert_eq!(buffer(&shell), "aaa");
    assert!(matches!(shell.state().mode, Mode::Normal));
}
