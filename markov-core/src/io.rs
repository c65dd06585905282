use std::fs::File;
use std::io;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Reads a text corpus as one character sequence per line.
///
/// - Line endings (`\n` / `\r\n`) are not part of the sequences
/// - Blank lines are skipped, they hold no transition
pub(crate) fn read_corpus<P: AsRef<Path>>(filename: P) -> io::Result<Vec<Vec<char>>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents
		.lines()
		.filter(|line| !line.trim().is_empty())
		.map(|line| line.chars().collect())
		.collect())
}

/// Builds the path of a file stored next to `input_path` with another extension.
///
/// Example:
/// `data/corpus.txt` + `"bin"` → `data/corpus.bin`
pub(crate) fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn corpus_lines_become_char_sequences() {
		let path = std::env::temp_dir().join(format!("markov-core-{}-io.txt", std::process::id()));
		std::fs::write(&path, "ab\r\n\n  \ncé\n").unwrap();

		let corpus = read_corpus(&path).unwrap();
		std::fs::remove_file(&path).unwrap();

		assert_eq!(corpus, vec![vec!['a', 'b'], vec!['c', 'é']]);
	}

	#[test]
	fn output_path_swaps_the_extension() {
		let path = build_output_path("data/corpus.txt", "bin").unwrap();
		assert_eq!(path, PathBuf::from("data/corpus.bin"));

		let bare = build_output_path("corpus", "bin").unwrap();
		assert_eq!(bare, PathBuf::from("corpus.bin"));
	}

	#[test]
	fn output_path_needs_a_filename() {
		assert!(build_output_path("/", "bin").is_err());
	}
}
