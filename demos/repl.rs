use latex_solver::{lex, pretty, Context, Equation, Expression};
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode,
};
use std::io::{BufRead, BufReader, Write};

const HELP: &str = "\
Commands:
  <expr>                evaluate an expression (e.g. 2 \\times x + 1)
  simplify <expr>       fold constants and apply identities
  solve <lhs> = <rhs>   solve for the single unknown
  set <name> <value>    bind a variable
  vars                  list the bound variables
  clear                 forget every variable
  help                  show this message
  exit, quit            leave the REPL";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    initialize_logging();

    let mut ctx = Context::new();
    let stdin = std::io::stdin();
    prompt()?;

    for line in BufReader::new(stdin.lock()).lines() {
        let line = line?;
        let line = line.trim();

        if !line.is_empty() && run_command(line, &mut ctx) == Flow::Exit {
            break;
        }

        prompt()?;
    }

    Ok(())
}

fn initialize_logging() {
    let level = std::env::var("LATEX_SOLVER_LOG")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Warn);

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Flow {
    Continue,
    Exit,
}

fn run_command(line: &str, ctx: &mut Context) -> Flow {
    let (command, rest) = match line.find(char::is_whitespace) {
        Some(ix) => (&line[..ix], line[ix..].trim()),
        None => (line, ""),
    };

    match command {
        "exit" | "quit" => return Flow::Exit,
        "help" => println!("{}", HELP),
        "vars" => {
            let mut variables: Vec<_> = ctx.iter().collect();
            variables.sort_by(|(l, _), (r, _)| l.cmp(r));

            for (name, value) in variables {
                println!("  {} = {}", name, value);
            }
        },
        "clear" => ctx.clear(),
        "set" => set_variable(rest, ctx),
        "simplify" => {
            if let Some(expr) = parse_or_report::<Expression>(rest) {
                println!("{}", latex_solver::simplify(&expr));
            }
        },
        "solve" => {
            if let Some(equation) = parse_or_report::<Equation>(rest) {
                match latex_solver::solve::solve(&equation, ctx) {
                    Ok(solution) => println!("{}", solution),
                    Err(e) => eprintln!("error: {}", e),
                }
            }
        },
        _ => {
            if let Some(expr) = parse_or_report::<Expression>(line) {
                match latex_solver::evaluate(&expr, ctx) {
                    Ok(value) => println!("{}", value),
                    Err(e) => eprintln!("error: {}", e),
                }
            }
        },
    }

    Flow::Continue
}

fn set_variable(args: &str, ctx: &mut Context) {
    let mut words = args.split_whitespace();

    match (words.next(), words.next().map(str::parse::<f64>), words.next()) {
        (Some(name), Some(Ok(value)), None) if lex::is_identifier(name) => {
            ctx.set(name, value);
            println!("  {} = {}", name, value);
        },
        (Some(name), Some(Ok(_)), None) => {
            eprintln!("error: \"{}\" is not a valid variable name", name)
        },
        _ => eprintln!("usage: set <name> <value>"),
    }
}

fn parse_or_report<T>(src: &str) -> Option<T>
where
    T: std::str::FromStr<Err = latex_solver::ParseError>,
{
    match src.parse() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            eprint!("{}", pretty::render_error(src, &e));
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_and_quit_stop_the_loop() {
        let mut ctx = Context::new();

        assert_eq!(run_command("exit", &mut ctx), Flow::Exit);
        assert_eq!(run_command("quit", &mut ctx), Flow::Exit);
        assert_eq!(run_command("1 + 1", &mut ctx), Flow::Continue);
    }

    #[test]
    fn set_only_accepts_variable_names() {
        let mut ctx = Context::new();

        run_command("set rate 0.5", &mut ctx);
        run_command("set 2x 5", &mut ctx);
        run_command("set y", &mut ctx);
        run_command("set \\sqrt 4", &mut ctx);

        assert_eq!(ctx, Context::new().with("rate", 0.5));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut ctx = Context::new().with("x", 1.0);

        run_command("clear", &mut ctx);

        assert!(ctx.is_empty());
    }
}
