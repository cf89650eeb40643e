// FinanceAI - terminal chat front-end for the bookkeeping engine
// Default mode is an interactive REPL; `demo` runs a scripted conversation.

use anyhow::Result;
use std::env;
use std::io::{self, BufRead, Write};

use financeai_core::{ChatEngine, LedgerConfig};

fn main() -> Result<()> {
    financeai_core::init_tracing();

    let args: Vec<String> = env::args().collect();

    let config = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            let path = args
                .get(i + 1)
                .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
            LedgerConfig::from_file(path)?
        }
        None => LedgerConfig::default(),
    };

    if args.iter().any(|a| a == "demo") {
        run_demo(config)
    } else {
        run_repl(config)
    }
}

fn print_welcome() {
    println!("💰 FinanceAI - your bookkeeping assistant");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Tell me about transactions: \"paid 25 for lunch\"");
    println!("Ask about your money: \"what's my balance?\", \"balance sheet\"");
    println!("Type 'quit' to leave.\n");
}

fn run_repl(config: LedgerConfig) -> Result<()> {
    print_welcome();

    let mut engine = ChatEngine::with_config(&config);
    let stdin = io::stdin();

    loop {
        print!("💬 > ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let message = line.trim();

        if message.is_empty() {
            continue;
        }
        if message.eq_ignore_ascii_case("quit") || message.eq_ignore_ascii_case("exit") {
            break;
        }

        let response = engine.respond(message);
        println!("\n{}\n", response.response_text);
    }

    println!("👋 Goodbye!");
    Ok(())
}

fn run_demo(config: LedgerConfig) -> Result<()> {
    println!("🎬 FinanceAI demo conversation");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    let mut engine = ChatEngine::with_config(&config);

    let script = [
        "paid 25 for lunch",
        "received 100 from client",
        "borrowed 500 from bank",
        "bought a printer for 150",
        "repaid 200 to bank",
        "what's my balance?",
        "show me the balance sheet",
        "income statement",
        "trial balance",
    ];

    for message in script {
        println!("💬 You: {}", message);
        let response = engine.respond(message);
        println!("🤖 FinanceAI:\n{}\n", response.response_text);
    }

    Ok(())
}
