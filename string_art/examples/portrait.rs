use std::{env, fs, path::PathBuf};

use string_art::{verboser::Message, Generator, Settings};

fn main() {
    let mut args = env::args().skip(1);
    let source = PathBuf::from(args.next().expect("usage: portrait <image> [lines]"));
    let lines = args.next().map_or(2000, |l| l.parse().unwrap());

    let image = image::open(&source).unwrap();
    let out = source.with_extension("");
    fs::create_dir_all(&out).unwrap();

    // Coarse to fine: each pass redoes the search with more lines.
    for step in 1..=4 {
        let settings = Settings::new(288, lines * step / 4);
        let generation = Generator::<f32>::new(&image, settings)
            .unwrap()
            .generate(&mut |message: Message| {
                if let Message::Computing(line) = message {
                    if line % 500 == 0 {
                        println!("pass {}: line {}", step, line);
                    }
                }
            })
            .unwrap();
        generation
            .image
            .save(out.join(format!("pass_{}.png", step)))
            .unwrap();
        fs::write(
            out.join(format!("instructions_{}.txt", step)),
            generation.instructions,
        )
        .unwrap();
    }
}
