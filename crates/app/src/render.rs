use ui::vm::{NavigatorVm, QuestionStatus, QuestionVm, ReportVm, TimerLevel, TimerVm};

pub fn print_question(question: &QuestionVm, timer: &TimerVm) {
    println!();
    println!(
        "{}  {}  [{}]  {}",
        question.progress_label,
        question.badge,
        question.category,
        timer_text(timer)
    );
    println!("{}", question.prompt);
    if question.is_multi {
        println!("(select all that apply)");
    }
    for option in &question.options {
        let mark = if option.selected { "x" } else { " " };
        println!("  [{mark}] {}. {}", option.letter, option.text);
    }

    let mut flags = Vec::new();
    if question.bookmarked {
        flags.push("⭐ bookmarked");
    }
    if question.review_later {
        flags.push("🚩 review later");
    }
    if !flags.is_empty() {
        println!("{}", flags.join("  "));
    }
    if let Some(feedback) = question.feedback {
        println!("{}", feedback.label());
    }
    if let Some(hint) = question.hint {
        println!("💡 {hint}");
    }
    if !question.note.is_empty() {
        println!("📝 {}", question.note);
    }
    println!("Time on this question: {}", question.time_spent_label);
}

pub fn timer_text(timer: &TimerVm) -> String {
    let marker = match timer.level {
        TimerLevel::Normal => "",
        TimerLevel::Warning => " !",
        TimerLevel::Critical => " !!",
    };
    format!("⏰ {}{marker}", timer.label)
}

pub fn print_navigator(nav: &NavigatorVm) {
    println!();
    println!("📋 Question Overview (filter: {})", nav.filter.key());
    if nav.items.is_empty() {
        println!("  no questions match");
    }
    for item in &nav.items {
        let status = match item.status {
            QuestionStatus::Attempted => "●",
            QuestionStatus::Visited => "◐",
            QuestionStatus::Unvisited => "○",
        };
        let current = if item.current { ">" } else { " " };
        let mut line = format!(
            "{current} {status} Q{:<3} {:<12} {}",
            item.number,
            item.status.label(),
            item.difficulty
        );
        if item.bookmarked {
            line.push_str(" ⭐");
        }
        if item.review_later {
            line.push_str(" 🚩");
        }
        println!("{line}");
    }
    let stats = nav.stats;
    println!(
        "Answered {}  Visited {}  Remaining {}  Progress {}%",
        stats.answered, stats.visited, stats.remaining, stats.progress_pct
    );
}

pub fn print_report(report: &ReportVm) {
    println!();
    println!("📊 Quiz Report for {}", report.email);
    println!(
        "Score {} ({}%, {})",
        report.score_label,
        report.percentage,
        report.score_class.label()
    );
    println!(
        "Correct {}  Incorrect {}  Time taken {}",
        report.correct, report.incorrect, report.time_taken_label
    );
    println!(
        "Average time per question {} ({})  Hints used {}",
        report.avg_time_label, report.tracked_label, report.hints_used
    );

    println!();
    println!("Accuracy by difficulty:");
    for row in &report.difficulty_rows {
        println!("  {:<8} {:>3}%  {}", row.label, row.pct, bar(row.pct));
    }

    if !report.category_rows.is_empty() {
        println!("Accuracy by category:");
        for row in &report.category_rows {
            println!("  {:<20} {:>3}%  {}", row.label, row.pct, bar(row.pct));
        }
    }

    if !report.matrix_rows.is_empty() {
        println!("Category × difficulty:");
        println!("  {:<20} {:>8} {:>8} {:>8}", "", "easy", "medium", "hard");
        for row in &report.matrix_rows {
            let cells: Vec<String> = row
                .cells
                .iter()
                .map(|cell| match cell.pct {
                    Some(pct) => format!("{:>8}", format!("{}/{} {pct}%", cell.correct, cell.total)),
                    None => format!("{:>8}", "–"),
                })
                .collect();
            println!("  {:<20} {}", row.category, cells.join(" "));
        }
    }
}

fn bar(pct: u32) -> String {
    let filled = usize::try_from(pct.min(100) / 10).unwrap_or(10);
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}
