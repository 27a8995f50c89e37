use clap::Parser;

#[derive(Parser)]
#[command(name = "greet")]
#[command(about = "Example script")]
struct Cli {
    /// Name to greet
    #[arg(long, default_value = "World")]
    name: String,
}

fn greeting(name: &str) -> String {
    format!("Hello, {name}!")
}

fn main() {
    let cli = Cli::parse();
    println!("{}", greeting(&cli.name));
}
