use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "r3ason")]
#[command(about = "Structured step-by-step reasoning over a chat-completions API", long_about = None)]
pub struct Args {
    #[arg(
        short = 'b',
        long = "buffered",
        help = "Use one blocking request instead of streaming the response"
    )]
    pub buffered: bool,

    #[arg(
        short = 'i',
        long = "interactive",
        help = "Keep the session open and read follow-up prompts from stdin"
    )]
    pub interactive: bool,

    #[arg(
        long = "api-endpoint",
        help = "Custom API base URL (e.g., http://localhost:11434/v1)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(help = "Prompt to send to the model")]
    pub prompt: Vec<String>,
}
