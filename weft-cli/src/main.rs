//! weft - inspect what the HTML and CSS parsers produce.
//!
//! Usage:
//!   weft decode <file> -e shift_jis    Decode bytes to UTF-8
//!   weft html-tokens <file>            Show HTML tokens and tokenizer errors
//!   weft html <file>                   Show the DOM tree and parse errors
//!   weft css-tokens <file>             Show CSS tokens
//!   weft css <file> [--json]           Show the parsed stylesheet
//!   weft declarations --text 'a: b'    Parse a declaration list
//!   weft selectors --text 'a > b'      Parse a selector list

use std::fmt::Display;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use weft_css::{CssLog, CssTokenizer, CssTokenizerOptions, SelectorParser, StylesheetParser};
use weft_dom::DomTree;
use weft_encoding::{Encoding, decode_to_string};
use weft_html::{HtmlParser, Token, Tokenizer, TokenizerOptions, TreeBuilderOptions};

/// weft - incremental, error-tolerant HTML and CSS parsing
#[derive(Parser, Debug)]
#[command(name = "weft")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Decode a Shift_JIS file
    weft decode -e shift_jis page.txt

    # Print the DOM tree of a document
    weft html index.html

    # Parse inline HTML
    weft html --text '<p>Hello<b>world'

    # Print the stylesheet as JSON
    weft css --json style.css

    # Selectors with their specificity
    weft selectors --text '#nav > li:nth-child(2n+1 of .item)'

    # Read from stdin
    cat style.css | weft css-tokens
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode bytes to UTF-8 with a WHATWG encoding
    Decode {
        #[command(flatten)]
        input: Input,

        /// Encoding label, e.g. `utf-8`, `gbk`, `shift_jis`
        #[arg(short, long, value_name = "LABEL", default_value = "utf-8", value_parser = parse_encoding)]
        encoding: Encoding,
    },

    /// Show HTML tokens and tokenizer parse errors
    HtmlTokens {
        #[command(flatten)]
        input: Input,

        /// Encoding label of the input bytes
        #[arg(short, long, value_name = "LABEL", default_value = "utf-8", value_parser = parse_encoding)]
        encoding: Encoding,
    },

    /// Parse an HTML document and show its tree
    Html {
        #[command(flatten)]
        input: Input,

        /// Encoding label of the input bytes
        #[arg(short, long, value_name = "LABEL", default_value = "utf-8", value_parser = parse_encoding)]
        encoding: Encoding,

        /// Print serialized HTML instead of the tree dump
        #[arg(long)]
        serialize: bool,

        /// Parse as if scripting were enabled
        #[arg(long)]
        scripting: bool,
    },

    /// Show CSS tokens
    CssTokens {
        #[command(flatten)]
        input: Input,

        /// Keep comment tokens
        #[arg(long)]
        comments: bool,
    },

    /// Parse a stylesheet
    Css {
        #[command(flatten)]
        input: Input,

        /// Output the stylesheet as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Parse a declaration list, as found in a `style` attribute
    Declarations {
        #[command(flatten)]
        input: Input,

        /// Output the declarations as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Parse a selector list and show specificity
    Selectors {
        #[command(flatten)]
        input: Input,

        /// Parse as a relative selector list (`> a, + b`)
        #[arg(short, long)]
        relative: bool,

        /// Output the selector arena as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Where the input comes from.
#[derive(Args, Debug)]
struct Input {
    /// Input file; stdin is read when neither FILE nor --text is given
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Use this text as input instead of a file
    #[arg(long, value_name = "TEXT", conflicts_with = "path")]
    text: Option<String>,
}

impl Input {
    fn bytes(&self) -> Result<Vec<u8>> {
        if let Some(text) = &self.text {
            return Ok(text.clone().into_bytes());
        }
        if let Some(path) = &self.path {
            return fs::read(path).with_context(|| format!("reading '{}'", path.display()));
        }
        let mut bytes = Vec::new();
        let _ = io::stdin()
            .read_to_end(&mut bytes)
            .context("reading standard input")?;
        Ok(bytes)
    }

    /// The input as text. A byte order mark is honored; otherwise UTF-8.
    fn text(&self) -> Result<String> {
        let (text, encoding, had_errors) = decode_to_string(Encoding::Utf8, &self.bytes()?);
        if had_errors {
            log::warn!("input is not valid {encoding}; replacement characters were substituted");
        }
        Ok(text)
    }
}

fn parse_encoding(label: &str) -> Result<Encoding, String> {
    Encoding::for_label(label).ok_or_else(|| format!("unknown encoding label '{label}'"))
}

/// Terminal styling.
#[derive(Debug, Clone, Copy)]
struct Printer {
    color: bool,
}

impl Printer {
    fn header(self, title: &str, count: usize) {
        let line = format!("=== {title} ({count}) ===");
        if self.color {
            println!("{}", line.bold());
        } else {
            println!("{line}");
        }
    }

    fn item(self, index: usize, item: impl Display) {
        if self.color {
            println!("  {:3}: {item}", index.dimmed());
        } else {
            println!("  {index:3}: {item}");
        }
    }

    fn problem(self, item: impl Display) {
        if self.color {
            println!("  {}", item.yellow());
        } else {
            println!("  {item}");
        }
    }

    fn problems<T: Display>(self, title: &str, problems: &[T]) {
        if problems.is_empty() {
            return;
        }
        println!();
        self.header(title, problems.len());
        for problem in problems {
            self.problem(problem);
        }
    }

    fn css_log(self, log: &CssLog) {
        self.problems("Diagnostics", log.messages());
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let printer = Printer {
        color: !cli.no_color && io::stdout().is_terminal(),
    };

    match cli.command {
        Command::Decode { input, encoding } => decode(&input, encoding),
        Command::HtmlTokens { input, encoding } => html_tokens(&input, encoding, printer),
        Command::Html {
            input,
            encoding,
            serialize,
            scripting,
        } => html(&input, encoding, serialize, scripting, printer),
        Command::CssTokens { input, comments } => css_tokens(&input, comments, printer),
        Command::Css { input, json } => css(&input, json, printer),
        Command::Declarations { input, json } => declarations(&input, json, printer),
        Command::Selectors {
            input,
            relative,
            json,
        } => selectors(&input, relative, json, printer),
    }
}

fn decode(input: &Input, encoding: Encoding) -> Result<()> {
    let (text, used, had_errors) = decode_to_string(encoding, &input.bytes()?);
    log::info!("decoded as {used}");
    if had_errors {
        log::warn!("input contained byte sequences invalid in {used}");
    }
    print!("{text}");
    Ok(())
}

fn html_tokens(input: &Input, encoding: Encoding, printer: Printer) -> Result<()> {
    let options = TokenizerOptions {
        encoding,
        ..TokenizerOptions::default()
    };
    let mut tokenizer: Tokenizer<Vec<Token>> = Tokenizer::with_options(Vec::new(), options);
    tokenizer.feed_bytes(&input.bytes()?)?;
    tokenizer.end()?;
    let errors = tokenizer.errors().to_vec();
    let tokens = tokenizer.into_sink();

    printer.header("HTML Tokens", tokens.len());
    for (index, token) in tokens.iter().enumerate() {
        printer.item(index, format!("{token:?}"));
    }
    printer.problems("Tokenizer Errors", errors.as_slice());
    Ok(())
}

fn html(
    input: &Input,
    encoding: Encoding,
    serialize: bool,
    scripting: bool,
    printer: Printer,
) -> Result<()> {
    let tokenizer_options = TokenizerOptions {
        encoding,
        ..TokenizerOptions::default()
    };
    let tree_options = TreeBuilderOptions {
        scripting,
        ..TreeBuilderOptions::default()
    };
    let mut parser = HtmlParser::with_options(DomTree::new(), tokenizer_options, tree_options);
    parser.feed_bytes(&input.bytes()?)?;
    let document = parser.finish()?;
    log::info!("document mode: {:?}", document.quirks_mode);

    let tree = &document.sink;
    if serialize {
        println!("{}", weft_dom::serialize::to_html(tree, tree.root())?);
    } else {
        printer.header("DOM Tree", tree.len());
        print!("{}", weft_dom::serialize::to_dump(tree)?);
    }
    printer.problems("Tokenizer Errors", document.tokenizer_errors.as_slice());
    printer.problems("Tree Construction Errors", document.tree_errors.as_slice());
    Ok(())
}

fn css_tokens(input: &Input, comments: bool, printer: Printer) -> Result<()> {
    let text = input.text()?;
    let options = CssTokenizerOptions::default().with_comments(comments);
    let mut tokenizer = CssTokenizer::with_options(&text, options);
    tokenizer.run()?;

    printer.header("CSS Tokens", tokenizer.tokens().len());
    for (index, (token, span)) in tokenizer.tokens().iter().zip(tokenizer.spans()).enumerate() {
        printer.item(index, format!("{token:?} @ {}..{}", span.start, span.end));
    }
    printer.problems("Tokenizer Errors", tokenizer.errors());
    Ok(())
}

fn css(input: &Input, json: bool, printer: Printer) -> Result<()> {
    let text = input.text()?;
    let mut parser = StylesheetParser::new();
    let sheet = parser.parse(&text)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sheet)?);
    } else {
        printer.header("Rules", sheet.rules.len());
        for (index, rule) in sheet.rules.iter().enumerate() {
            printer.item(index, format!("{rule:#?}"));
        }
    }
    printer.css_log(parser.log());
    Ok(())
}

fn declarations(input: &Input, json: bool, printer: Printer) -> Result<()> {
    let text = input.text()?;
    let mut parser = StylesheetParser::new();
    let declarations = parser.parse_declarations(&text)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&declarations)?);
    } else {
        printer.header("Declarations", declarations.len());
        for (index, declaration) in declarations.iter().enumerate() {
            let value = weft_common::to_string_with(|out| {
                weft_css::syntax::serialize_component_values(&declaration.value, out)
            })?;
            let important = if declaration.important { " !important" } else { "" };
            printer.item(index, format!("{}: {}{important}", declaration.name, value.trim()));
        }
    }
    printer.css_log(parser.log());
    Ok(())
}

fn selectors(input: &Input, relative: bool, json: bool, printer: Printer) -> Result<()> {
    let text = input.text()?;
    let mut parser = SelectorParser::new();
    let result = if relative {
        parser.parse_relative_list(&text)
    } else {
        parser.parse_list(&text)
    };
    let Ok(selectors) = result else {
        printer.css_log(parser.log());
        bail!("no valid selector in '{}'", text.trim());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&selectors)?);
    } else {
        let specificities = selectors.specificities();
        printer.header("Selectors", selectors.len());
        for (index, (complex, specificity)) in selectors
            .root()
            .selectors
            .iter()
            .zip(&specificities)
            .enumerate()
        {
            let compounds = complex.compounds().count();
            printer.item(
                index,
                format!(
                    "{} compound(s), specificity ({}, {}, {})",
                    compounds, specificity.0, specificity.1, specificity.2
                ),
            );
        }
        println!();
        println!("{}", selectors.to_css()?);
    }
    printer.css_log(parser.log());
    Ok(())
}
