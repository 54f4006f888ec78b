//! Filename normalization.

// Accented letters and the ASCII letter each one folds to.
const FOLDS: &[(&str, char)] = &[
    ("áàãâä", 'a'),
    ("éèêë", 'e'),
    ("íìîï", 'i'),
    ("óòõôö", 'o'),
    ("úùûü", 'u'),
    ("ç", 'c'),
    ("ñ", 'n'),
    ("ýỳŷÿ", 'y'),
    ("đ", 'd'),
    ("š", 's'),
    ("ž", 'z'),
];

fn fold(c: char) -> char {
    FOLDS
        .iter()
        .find(|(set, _)| set.contains(c))
        .map(|&(_, base)| base)
        .unwrap_or(c)
}

fn is_sep(c: char) -> bool {
    c == '/' || c == '\\'
}

fn keep(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Make `name` safe to use as a file or directory name.
///
/// The name is lower-cased, accented Latin letters are folded to their
/// base letter and every other character outside `[a-z0-9]` and whitespace
/// becomes `_`. Path separators are left in place. When the name contains
/// `..`, everything up to the last separator is kept verbatim and only the
/// final component is rewritten.
///
/// ```
/// assert_eq!(ezfs::sanitize_name("Relatório Final!"), "relatorio final_");
/// assert_eq!(ezfs::sanitize_name("Fotos/Verão"), "fotos/verao");
/// ```
pub fn sanitize_name(name: &str) -> String {
    let (prefix, rest) = if name.contains("..") {
        match name.rfind(is_sep) {
            Some(i) => name.split_at(i + 1),
            None => ("", name),
        }
    } else {
        ("", name)
    };

    let cleaned: String = rest
        .to_lowercase()
        .chars()
        .map(|c| {
            if is_sep(c) {
                return c;
            }
            let c = fold(c);
            if keep(c) {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("{prefix}{cleaned}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_accents_and_lowercases() {
        assert_eq!(sanitize_name("ÁÉÍÓÚ çñ ÿ"), "aeiou cn y");
        assert_eq!(sanitize_name("Đšž"), "dsz");
    }

    #[test]
    fn replaces_specials_but_keeps_separators() {
        assert_eq!(sanitize_name("my-file.txt"), "my_file_txt");
        assert_eq!(sanitize_name("a/b\\c d"), "a/b\\c d");
        assert_eq!(sanitize_name("100%@home"), "100__home");
    }

    #[test]
    fn traversal_prefix_is_kept() {
        assert_eq!(sanitize_name("../Up/Ação"), "../Up/acao");
        assert_eq!(sanitize_name("..Weird"), "__weird");
    }
}
