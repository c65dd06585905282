use markov_core::sampler::select_default;
use markov_core::{GenerationInput, MarkovChain};

fn main() -> Result<(), Box<dyn std::error::Error>> {
	// RUST_LOG=debug shows training, cache and generation logs
	env_logger::init();

	// Train a character model on every line of the corpus
	// Load automatically names.bin if existing
	let chain = MarkovChain::<char>::from_text_file("./data/names.txt", 3)?;
	log::info!("{} contexts of order {}", chain.len(), chain.order());

	// Generate 10 words from random trained contexts
	for seed in 0..10 {
		let word: String = chain.generate(12, seed)?.into_iter().collect();
		println!("Generated word {}: {}", seed + 1, word);
	}

	// Continue a custom start; it must hold at least `order` symbols
	let input = GenerationInput::new()
		.with_start("mar".chars().collect::<Vec<_>>())
		.with_max_length(8)
		.with_seed(42);
	let word: String = chain.generate_with(&input)?.into_iter().collect();
	println!("Starting with 'mar': {}", word);

	match chain.generate_from(&['m', 'a'], 8, 0) {
		Ok(_) => println!("Should not happen"),
		Err(e) => println!("Start 'ma' is too short: {}", e),
	}

	// Known names score higher than random letters
	for candidate in ["valentine", "zzqxwvkj"] {
		let symbols: Vec<char> = candidate.chars().collect();
		println!("log P({}) = {:.3}", candidate, chain.evaluate_log_probability(&symbols)?);
	}

	let mut letters: Vec<char> = chain.possible_symbol_classes().into_iter().collect();
	letters.sort_unstable();
	println!("Alphabet: {}", letters.iter().collect::<String>());

	// Roulette selection works on its own
	let vowel = select_default(&['a', 'e', 'i', 'o', 'u'], &[5.0, 8.0, 3.0, 2.0, 1.0])?;
	println!("Weighted vowel: {}", vowel);

	Ok(())
}
