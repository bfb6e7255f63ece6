use proptest::prelude::*;
use rstest::rstest;
use slice_lang::printer;
use slice_lang::report::ErrorCollector;
use slice_lang::scanner::{self, token::Span, token::Token};
use slice_lang::{Literal, ScanErrorKind, TokenKind};

fn scan_ok(source: &str) -> Vec<Token> {
    scanner::scan_all(source).expect("scan should succeed")
}

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

/// Everything between two tokens must be whitespace or a line comment.
fn assert_only_trivia(gap: &str) {
    let mut rest = gap;
    while !rest.is_empty() {
        if let Some(comment) = rest.strip_prefix("//") {
            rest = comment.find('\n').map_or("", |nl| &comment[nl..]);
            continue;
        }
        let mut chars = rest.chars();
        let c = chars.next().expect("non-empty");
        assert!(matches!(c, ' ' | '\t' | '\r' | '\n'), "non-trivia {c:?} in gap {gap:?}");
        rest = chars.as_str();
    }
}

/// Lexemes plus the elided trivia rebuild the source, and every token's
/// line is the line of its last character.
fn assert_reconstructs(source: &str, tokens: &[Token]) {
    let mut cursor = 0;
    for token in tokens {
        assert_only_trivia(&source[cursor..token.span.offset]);
        assert_eq!(&source[token.span.offset..token.span.end()], token.lexeme);

        let last = if token.span.len == 0 {
            token.span.offset
        } else {
            token.span.end() - 1
        };
        let expected_line = 1 + source[..last].matches('\n').count();
        assert_eq!(token.line, expected_line, "line of {token}");
        cursor = token.span.end();
    }
    assert_eq!(cursor, source.len());
}

#[rstest]
#[case::hello(include_str!("../fixtures/hello.slice"), include_str!("../fixtures/hello.expected"))]
#[case::classes(include_str!("../fixtures/classes.slice"), include_str!("../fixtures/classes.expected"))]
#[case::operators(include_str!("../fixtures/operators.slice"), include_str!("../fixtures/operators.expected"))]
#[case::multiline(include_str!("../fixtures/multiline.slice"), include_str!("../fixtures/multiline.expected"))]
fn fixture_token_dump(#[case] source: &str, #[case] expected: &str) {
    let tokens = scan_ok(source);
    assert_eq!(printer::to_text(&tokens), expected);
    assert_reconstructs(source, &tokens);
}

#[test]
fn fixture_with_errors_keeps_scanning() {
    let source = include_str!("../fixtures/errors.slice");
    let expected = include_str!("../fixtures/errors.expected");

    let mut collector = ErrorCollector::new();
    let tokens = scanner::scan(source, &mut collector);
    assert_eq!(printer::to_text(&tokens), expected);

    let errors = collector.errors();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].kind(), ScanErrorKind::UnexpectedCharacter('@'));
    assert_eq!(errors[0].line(), 2);
    assert_eq!(errors[1].kind(), ScanErrorKind::UnterminatedString);
    assert_eq!(errors[1].line(), 3);
    assert_eq!(errors[1].span().end(), source.len());
}

#[test]
fn scan_all_returns_every_error() {
    let errors = scanner::scan_all("@ # \"open").expect_err("scan should fail");
    let found: Vec<ScanErrorKind> = errors.iter().map(|e| e.kind()).collect();
    assert_eq!(
        found,
        vec![
            ScanErrorKind::UnexpectedCharacter('@'),
            ScanErrorKind::UnexpectedCharacter('#'),
            ScanErrorKind::UnterminatedString,
        ]
    );
}

#[rstest]
#[case("")]
#[case("   \n\t\r\n")]
#[case("// only a comment")]
#[case("\"unterminated")]
#[case("@@@")]
#[case("var x = 1;\nprint x;")]
#[case("123.")]
fn exactly_one_trailing_eof(#[case] source: &str) {
    let mut errors = ErrorCollector::new();
    let tokens = scanner::scan(source, &mut errors);
    let last = tokens.last().expect("at least EOF");
    assert_eq!(last.kind, TokenKind::Eof);
    assert_eq!(last.lexeme, "");
    assert_eq!(last.literal, None);
    assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
}

#[test]
fn scenario_var_comment_print() {
    let tokens = scan_ok("var x = 12.5;\n// comment\nprint x;");
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Var,
            TokenKind::Identifier,
            TokenKind::Equal,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::Print,
            TokenKind::Identifier,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[1].lexeme, "x");
    assert_eq!(tokens[3].literal, Some(Literal::Number(12.5)));
    assert!(tokens[..5].iter().all(|t| t.line == 1));
    assert!(tokens[5..].iter().all(|t| t.line == 3));
}

#[rstest]
#[case("!=", TokenKind::BangEqual)]
#[case("==", TokenKind::EqualEqual)]
#[case("<=", TokenKind::LessEqual)]
#[case(">=", TokenKind::GreaterEqual)]
fn two_char_operators_are_one_token(#[case] source: &str, #[case] expected: TokenKind) {
    assert_eq!(kinds(&scan_ok(source)), vec![expected, TokenKind::Eof]);
}

#[test]
fn comment_and_division() {
    assert_eq!(kinds(&scan_ok("// nothing here")), vec![TokenKind::Eof]);
    assert_eq!(kinds(&scan_ok("/")), vec![TokenKind::Slash, TokenKind::Eof]);
}

#[test]
fn class_versus_classic() {
    assert_eq!(kinds(&scan_ok("class")), vec![TokenKind::Class, TokenKind::Eof]);
    assert_eq!(
        kinds(&scan_ok("classic")),
        vec![TokenKind::Identifier, TokenKind::Eof]
    );
}

#[test]
fn string_literal_and_unterminated_string() {
    let tokens = scan_ok("\"abc\"");
    assert_eq!(tokens[0].literal, Some(Literal::Str("abc".into())));

    let mut errors = ErrorCollector::new();
    let tokens = scanner::scan("\"abc", &mut errors);
    assert_eq!(kinds(&tokens), vec![TokenKind::Eof]);
    assert_eq!(errors.errors().len(), 1);
}

/// One lexeme that scans cleanly on its own.
fn clean_lexeme() -> impl Strategy<Value = String> {
    prop_oneof![
        r"[a-zA-Z_][a-zA-Z0-9_]{0,8}",
        r"(and|class|else|false|for|fun|if|nil|or|print|return|super|this|true|var|while)",
        r"[0-9]{1,5}(\.[0-9]{1,3})?",
        r#""[^"]{0,12}""#,
        r"[(){},.;*/+\-!=<>]",
        r"(!=|==|<=|>=)",
    ]
}

/// Trivia that keeps neighbouring lexemes apart.
fn separator() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(" "),
        Just("\t"),
        Just("\n"),
        Just("\r\n"),
        Just(" // note\n"),
    ]
}

proptest! {
    #[test]
    fn any_source_scans_to_ordered_tokens_and_one_eof(
        source in r#"(\PC|[\n\r\t"/.0-9a-z=!<>])*"#
    ) {
        let mut errors = ErrorCollector::new();
        let tokens = scanner::scan(&source, &mut errors);

        let (eof, rest) = tokens.split_last().expect("at least EOF");
        prop_assert_eq!(eof.kind, TokenKind::Eof);
        prop_assert_eq!(eof.lexeme.as_str(), "");
        prop_assert_eq!(eof.span, Span::new(source.len(), 0));
        prop_assert_eq!(eof.line, 1 + source.matches('\n').count());
        prop_assert!(rest.iter().all(|t| t.kind != TokenKind::Eof));

        let mut cursor = 0;
        for token in rest {
            prop_assert!(token.span.offset >= cursor, "{} starts before {}", token, cursor);
            prop_assert_eq!(&source[token.span.offset..token.span.end()], token.lexeme.as_str());
            cursor = token.span.end();
        }
    }

    #[test]
    fn clean_programs_reconstruct_from_lexemes(
        pieces in proptest::collection::vec((clean_lexeme(), separator()), 0..48)
    ) {
        let source: String = pieces
            .iter()
            .flat_map(|(lexeme, sep)| [lexeme.as_str(), *sep])
            .collect();
        let tokens = scanner::scan_all(&source);
        prop_assert!(tokens.is_ok(), "errors in {:?}: {:?}", source, tokens.as_ref().err());
        let tokens = tokens.expect("checked above");

        prop_assert_eq!(tokens.len(), pieces.len() + 1);
        assert_reconstructs(&source, &tokens);
    }
}
