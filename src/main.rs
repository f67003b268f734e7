use std::io::{self, Read};

use svg_snip::{load_scene, WriterSurface};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("svg-snip - Render a JSON scene description to SVG");
        println!();
        println!("Usage: svg-snip [OPTIONS] [INPUT]");
        println!();
        println!("Reads a scene from argument or stdin and outputs an SVG document.");
        println!();
        println!("Options:");
        println!("  -h, --help     Show this help message");
        println!("  -d, --debug    Prepend the escaped SVG source in a <details> block");
        println!();
        println!("Example:");
        println!(r#"  echo '{{"canvas":{{"width":20,"height":20}},"scene":[{{"shape":"circle","r":5}}]}}' | svg-snip"#);
        println!("  RUST_LOG=debug svg-snip scene.json");
        return;
    }

    let debug = args.iter().any(|a| a == "-d" || a == "--debug");

    // Argument is either inline JSON or a path to a scene file
    let input = match args.iter().skip(1).find(|a| !a.starts_with('-')) {
        Some(arg) if arg.trim_start().starts_with('{') => Ok(arg.clone()),
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map(|_| buf)
        }
    };
    let input = match input {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if input.trim().is_empty() {
        eprintln!("Error: No input provided");
        std::process::exit(1);
    }

    if let Err(e) = run(&input, debug) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(input: &str, debug: bool) -> svg_snip::Result<()> {
    let mut scene = load_scene(input)?;
    scene.options.debug = scene.options.debug || debug;

    if scene.frames.is_empty() {
        let surface = Box::new(WriterSurface::new(io::stdout()));
        scene.composer.display(surface, &scene.options)
    } else {
        let output = scene.render()?;
        println!("{}", output);
        Ok(())
    }
}
