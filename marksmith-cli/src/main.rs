// Command-line interface for marksmith
//
// This binary renders extended Markdown files to HTML and exposes the parsed
// document tree for inspection.
//
// Usage:
//  marksmith <input> [--output <file>]            - Render to HTML (default)
//  marksmith convert <input> [--output <file>]    - Same as above (explicit)
//  marksmith inspect <path> [<transform>]         - Print a view of the tree (defaults to "ast-treeviz")
//  marksmith generate-css [--theme <name>]        - Print the standalone page stylesheet
//  marksmith --list-languages                     - List highlighting languages
//
// Extra Parameters:
//
// Renderer and output knobs can be passed using --extra-<parameter-name> <value>.
// They override the layered configuration (defaults, marksmith.toml, --config).
// Example:
//  marksmith notes.md --extra-standalone --extra-title "My notes"

mod transforms;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use marksmith_config::{Loader, MarksmithConfig, LOCAL_CONFIG_FILE};
use marksmith_core::formats::get_default_css;
use marksmith_core::highlight::theme_css;
use marksmith_core::{standalone_page, PageAssets, Renderer, RendererOptions, EMPTY_DOCUMENT_HTML};
use std::collections::HashMap;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &["convert", "inspect", "generate-css", "help"];

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "MARKSMITH_LOG";

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"));

        if let Some(key) = key_opt {
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("marksmith")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render extended Markdown to HTML")
        .long_about(
            "marksmith renders Markdown with task lists, tables, footnotes, math,\n\
            diagrams, emoji and video thumbnails to HTML.\n\n\
            Commands:\n  \
            - convert: Render a Markdown file to HTML (default)\n  \
            - inspect: View the parsed document tree and its metadata\n  \
            - generate-css: Print the stylesheet used for standalone pages\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override configuration.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            marksmith notes.md                         # HTML fragment on stdout\n  \
            marksmith notes.md -o notes.html --extra-standalone\n  \
            marksmith inspect notes.md ast-json        # Document tree as JSON",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-languages")
                .long("list-languages")
                .help("List syntax highlighting languages and file type bindings")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a marksmith.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log pipeline steps to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Render a Markdown file to HTML (default command)")
                .long_about(
                    "Render a Markdown file to HTML.\n\n\
                    Output is an HTML fragment unless standalone output is enabled\n\
                    (`[convert] standalone = true` or --extra-standalone), which wraps\n\
                    it in a complete page with stylesheets and, when the document\n\
                    needs them, math and diagram scripts.\n\n\
                    Extra Parameters:\n  \
                    --extra-standalone [bool]      Emit a complete HTML page\n  \
                    --extra-title <text>           Page title (defaults to the file stem)\n  \
                    --extra-css <path>             Stylesheet appended to the page\n  \
                    --extra-highlight <bool>       Syntax highlighting\n  \
                    --extra-external-links [bool]  Open absolute links in a new tab\n  \
                    --extra-lazy-images [bool]     Lazy-load images\n  \
                    --extra-syntax-dir <path>      Load extra .sublime-syntax grammars",
                )
                .arg(
                    Arg::new("input")
                        .help("Markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect the parsed document tree")
                .long_about(
                    "View the document tree produced by the pre-processor, lexer and\n\
                    annotator.\n\n\
                    Transforms:\n  \
                    - ast-treeviz:    Tree visualization (default)\n  \
                    - ast-json:       Tree and metadata as JSON\n  \
                    - metadata-json:  Code languages, diagrams and math only\n\n\
                    Extra Parameters:\n  \
                    --extra-pretty false    Single-line JSON",
                )
                .arg(
                    Arg::new("path")
                        .help("Markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply. Defaults to the configured transform")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("generate-css")
                .about("Output the default CSS used for standalone pages")
                .long_about(
                    "Outputs the baseline CSS embedded in standalone pages.\n\n\
                    Use this as a starting point for custom styling and pass the\n\
                    edited file back with --extra-css.\n\n\
                    Examples:\n  \
                    marksmith generate-css                          # Baseline CSS\n  \
                    marksmith generate-css --theme InspiredGitHub   # Plus highlighting",
                )
                .arg(
                    Arg::new("theme")
                        .long("theme")
                        .value_name("NAME")
                        .help("Append the stylesheet of a highlighting theme")
                        .value_hint(ValueHint::Other),
                ),
        )
}

/// Parse the cleaned arguments, injecting `convert` when the first argument
/// is a path rather than a subcommand.
fn parse_matches(cleaned_args: &[String]) -> ArgMatches {
    let cli = build_cli();
    match cli.clone().try_get_matches_from(cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            let looks_like_path = cleaned_args
                .get(1)
                .is_some_and(|first| !first.starts_with('-') && !SUBCOMMANDS.contains(&first.as_str()));
            if !looks_like_path {
                e.exit();
            }

            let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
            new_args.extend_from_slice(&cleaned_args[1..]);
            match cli.try_get_matches_from(&new_args) {
                Ok(m) => m,
                Err(e2) => e2.exit(),
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);
    let matches = parse_matches(&cleaned_args);

    init_logging(matches.get_flag("verbose"));

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);

    if matches.get_flag("list-languages") {
        handle_list_languages_command(&config);
        return;
    }

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                exit_with("input is required");
            };
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            warn_unused(&extra_params);
            handle_convert_command(input, output, &config);
        }
        Some(("inspect", sub_matches)) => {
            let Some(path) = sub_matches.get_one::<String>("path") else {
                exit_with("path is required");
            };
            let transform = sub_matches
                .get_one::<String>("transform")
                .cloned()
                .unwrap_or_else(|| config.inspect.default_transform.clone());
            let params = build_inspect_params(&config, &extra_params);
            handle_inspect_command(path, &transform, &params, &config);
        }
        Some(("generate-css", sub_matches)) => {
            let theme = sub_matches.get_one::<String>("theme").map(|s| s.as_str());
            handle_generate_css_command(theme);
        }
        _ => exit_with("Unknown subcommand. Use --help for usage information."),
    }
}

/// Print `Error: <message>` to stderr and exit with status 1
fn exit_with(message: impl Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn read_source(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with(format!("failed to read '{path}': {e}")))
}

fn build_renderer(config: &MarksmithConfig) -> Renderer {
    Renderer::new(RendererOptions::from(&config.render))
}

/// Handle the convert command
fn handle_convert_command(input: &str, output: Option<&str>, config: &MarksmithConfig) {
    let renderer = build_renderer(config);
    let source = read_source(input);

    let document = renderer.parse(&source);
    let body = if source.trim().is_empty() {
        EMPTY_DOCUMENT_HTML.to_string()
    } else {
        renderer
            .render_document(&document)
            .unwrap_or_else(|e| exit_with(e))
    };

    let html = if config.convert.standalone {
        let mut assets = document
            .metadata
            .as_ref()
            .map(|metadata| PageAssets::for_metadata(metadata, config.render.highlight))
            .unwrap_or_default();
        if let Some(css_path) = &config.convert.custom_css {
            let css = fs::read_to_string(css_path).unwrap_or_else(|e| {
                exit_with(format!("failed to read '{}': {e}", css_path.display()))
            });
            assets = assets.with_custom_css(css);
        }
        let title = config.convert.title.clone().unwrap_or_else(|| {
            Path::new(input)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        standalone_page(&body, &title, &assets)
    } else {
        body
    };

    match output {
        Some(path) => {
            fs::write(path, html)
                .unwrap_or_else(|e| exit_with(format!("failed to write '{path}': {e}")));
            tracing::info!(input, output = path, "wrote HTML");
        }
        None => print!("{html}"),
    }
}

/// Handle the inspect command
fn handle_inspect_command(
    path: &str,
    transform: &str,
    params: &HashMap<String, String>,
    config: &MarksmithConfig,
) {
    let source = read_source(path);
    let renderer = build_renderer(config);
    let output = transforms::execute_transform(&source, transform, &renderer, params)
        .unwrap_or_else(|e| exit_with(e));
    print!("{output}");
}

/// Handle the generate-css command
fn handle_generate_css_command(theme: Option<&str>) {
    print!("{}", get_default_css());
    if let Some(theme) = theme {
        let css = theme_css(theme).unwrap_or_else(|e| exit_with(e));
        println!();
        print!("{css}");
    }
}

/// Handle the list-languages command
fn handle_list_languages_command(config: &MarksmithConfig) {
    let renderer = build_renderer(config);

    println!("Highlighting languages:\n");
    let languages = renderer.highlighter().languages();
    if languages.is_empty() {
        println!("  (highlighting disabled)");
    }
    for language in languages {
        println!("  {language}");
    }

    println!("\nFile type bindings:\n");
    for (extension, language) in renderer.registry().file_types() {
        println!("  {extension:<12} {language}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> MarksmithConfig {
    let loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader
        .build()
        .unwrap_or_else(|err| exit_with(format!("failed to load configuration: {err}")))
}

fn apply_config_overrides(config: &mut MarksmithConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = extra_params.remove("highlight") {
        config.render.highlight = parse_bool_arg("highlight", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["load-languages", "load-additional-languages"]) {
        config.render.load_additional_languages = parse_bool_arg("load-languages", &raw);
    }
    if let Some(dir) = extra_params.remove("syntax-dir") {
        config.render.syntax_dir = Some(dir.into());
        config.render.load_additional_languages = true;
    }
    if let Some(raw) = take_override(extra_params, &["external-links", "external-links-new-tab"]) {
        config.render.external_links_new_tab = parse_bool_arg("external-links", &raw);
    }
    if let Some(raw) = extra_params.remove("lazy-images") {
        config.render.lazy_images = parse_bool_arg("lazy-images", &raw);
    }

    if let Some(raw) = extra_params.remove("standalone") {
        config.convert.standalone = parse_bool_arg("standalone", &raw);
    }
    if let Some(title) = extra_params.remove("title") {
        config.convert.title = Some(title);
    }
    if let Some(path) = take_override(extra_params, &["css", "css-path"]) {
        config.convert.custom_css = Some(path.into());
    }

    if let Some(raw) = extra_params.remove("pretty") {
        config.inspect.pretty_json = parse_bool_arg("pretty", &raw);
    }
}

fn build_inspect_params(
    config: &MarksmithConfig,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut params = HashMap::new();
    params.insert("pretty".to_string(), config.inspect.pretty_json.to_string());
    for (key, value) in overrides {
        params.insert(key.clone(), value.clone());
    }
    params
}

fn warn_unused(extra_params: &HashMap<String, String>) {
    for key in extra_params.keys() {
        tracing::warn!(parameter = %key, "ignoring unknown --extra parameter");
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| map.remove(*key))
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => exit_with(format!("invalid boolean value '{other}' for --extra-{flag}")),
    }
}
