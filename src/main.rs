use std::env;
use std::process;

use z2glsl::expression_to_glsl;

fn main() {
  let args: Vec<String> = env::args().collect();
  if args.len() != 2 {
    let program = args.first().map(String::as_str).unwrap_or("z2glsl");
    eprintln!("usage: {program} <expr>");
    process::exit(1);
  }

  match expression_to_glsl(&args[1]) {
    Ok(glsl) => println!("{glsl}"),
    Err(err) => {
      eprintln!("{err}");
      process::exit(1);
    }
  }
}
