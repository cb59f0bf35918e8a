use std::collections::BTreeMap;
use std::error::Error;
use std::io::{self, Write};

use chrono::{Days, NaiveDate};
use log::debug;

use crate::error::TodoError;
use crate::task::Task;
use crate::todo::Todo;

const MENU: &str = "\
1) Today's tasks
2) Week's tasks
3) All tasks
4) Missed tasks
5) Add task
6) Delete task
0) Exit";

/// Inline task line: description plus deadline, day without a leading zero.
pub fn format_task(task: &Task) -> String {
    format!("{}. {}", task.description, task.deadline.format("%-d %b"))
}

/// Section header: full weekday, day without a leading zero, month.
pub fn format_date_header(date: NaiveDate) -> String {
    date.format("%A %-d %b").to_string()
}

/// Print `tasks` numbered from 1, followed by a blank line, and return the
/// displayed-number -> task id mapping used by delete-by-selection. With
/// `week_formatting` only the description is printed, since the deadline
/// already sits in the section header.
pub fn list_tasks<W: Write>(
    out: &mut W,
    tasks: &[Task],
    week_formatting: bool,
) -> io::Result<BTreeMap<usize, i64>> {
    let mut numbered = BTreeMap::new();
    if tasks.is_empty() {
        writeln!(out, "Nothing to do!")?;
    } else {
        for (i, task) in tasks.iter().enumerate() {
            let number = i + 1;
            if week_formatting {
                writeln!(out, "{} {}", number, task.description)?;
            } else {
                writeln!(out, "{}. {}", number, format_task(task))?;
            }
            numbered.insert(number, task.id);
        }
    }
    writeln!(out)?;
    Ok(numbered)
}

/// Seven consecutive days starting today, each with its header and the week
/// tasks due that day. Week tasks past the seventh day match no header and
/// stay out of this view.
pub fn print_week_view<W: Write>(out: &mut W, todo: &Todo) -> io::Result<()> {
    let tasks = todo.get_week_tasks();
    let mut day = todo.today();
    for _ in 0..7 {
        writeln!(out, "{}:", format_date_header(day))?;
        let day_tasks: Vec<Task> = tasks
            .iter()
            .filter(|task| task.deadline == day)
            .cloned()
            .collect();
        list_tasks(out, &day_tasks, true)?;
        day = day + Days::new(1);
    }
    Ok(())
}

fn parse_deadline(input: &str) -> Result<NaiveDate, TodoError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| TodoError::InvalidDateFormat(input.to_string()))
}

fn numbered_id(numbered: &BTreeMap<usize, i64>, input: &str) -> Result<i64, TodoError> {
    input
        .parse::<usize>()
        .ok()
        .and_then(|number| numbered.get(&number).copied())
        .ok_or_else(|| TodoError::InvalidSelection(input.to_string()))
}

pub fn run_app(todo: &mut Todo) -> Result<(), Box<dyn Error>> {
    loop {
        let choice = match prompt(MENU) {
            Some(choice) => choice,
            None => return Ok(()), // stdin closed
        };
        println!();
        debug!("menu choice {:?}", choice);

        match choice.as_str() {
            "1" => {
                println!("{}:", format_date_header(todo.today()));
                list_tasks(&mut io::stdout(), &todo.get_today_tasks(), false)?;
            }
            "2" => {
                print_week_view(&mut io::stdout(), todo)?;
            }
            "3" => {
                println!("All tasks:");
                list_tasks(&mut io::stdout(), &todo.get_all_tasks(), false)?;
                println!();
            }
            "4" => {
                println!("Missed tasks:");
                list_tasks(&mut io::stdout(), &todo.get_missed_tasks(), false)?;
            }
            "5" => {
                if let Some(description) = prompt("Enter task") {
                    if let Some(deadline) = prompt("Enter deadline") {
                        match parse_deadline(&deadline) {
                            Ok(date) => {
                                todo.add_task(&description, Some(date))?;
                                println!("The task has been added!\n");
                            }
                            Err(err) => println!("{}\n", err),
                        }
                    }
                }
            }
            "6" => {
                println!("Choose the number of the task you want to delete:");
                let numbered = list_tasks(&mut io::stdout(), &todo.get_all_tasks(), false)?;
                if let Some(selection) = read_line() {
                    match numbered_id(&numbered, &selection) {
                        Ok(id) => {
                            todo.delete_task(id)?;
                            println!("The task has been deleted!\n");
                        }
                        Err(err) => println!("{}\n", err),
                    }
                }
            }
            "0" => {
                println!("Bye!");
                return Ok(());
            }
            _ => {}
        }
    }
}

fn prompt(message: &str) -> Option<String> {
    println!("{}", message);
    read_line()
}

fn read_line() -> Option<String> {
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}
