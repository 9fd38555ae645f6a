//! URL slugs: strip punctuation, fold accents, dash the spaces.

// ASCII punctuation without `-`, plus the acute accent.
const STRIPPED: &str = "!\"#$%&'()*+,./:;<=>?@[\\]^_`{|}~´";

/// Turn free text into a URL- and package-safe slug.
///
/// Punctuation (except `-`) is dropped, spaces become dashes, the Latin-1
/// accent range folds to ASCII, everything else passes through, and the
/// result is lowercased. `bob create` uses this to derive the scaffolded
/// package name.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.chars() {
        if STRIPPED.contains(ch) {
            continue;
        }
        slug.push(fold(ch));
    }
    slug.to_lowercase()
}

fn fold(ch: char) -> char {
    match ch {
        ' ' => '-',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Æ' | 'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'æ' => 'a',
        'Ç' | 'ç' => 'c',
        'È' | 'É' | 'Ê' | 'Ë' | 'Ð' | 'è' | 'é' | 'ê' | 'ë' => 'e',
        'Ì' | 'Í' | 'Î' | 'Ï' | 'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'ù' | 'ú' | 'û' | 'ü' => 'u',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_dashes() {
        assert_eq!(slugify("simple string with spaces"), "simple-string-with-spaces");
    }

    #[test]
    fn punctuation_is_stripped_but_dashes_survive() {
        assert_eq!(
            slugify("here!@#$%*-()_+and{}[]-~^`'´/?\\|there"),
            "here-and-there"
        );
    }

    #[test]
    fn accents_fold_to_ascii() {
        assert_eq!(slugify("Ação"), "acao");
        assert_eq!(slugify("São Paulo"), "sao-paulo");
        assert_eq!(slugify("crème brûlée"), "creme-brulee");
    }

    #[test]
    fn unmapped_letters_pass_through_lowercased() {
        assert_eq!(slugify("Piñata"), "piñata");
    }

    #[test]
    fn slugs_are_stable() {
        assert_eq!(slugify("already-slugged"), "already-slugged");
    }
}
