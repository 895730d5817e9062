use pretty_assertions::assert_eq;
use super::*;

fn token_types(source: &str) -> Vec<TokenType> {
    tokenize(source).expect("tokenize failed").iter().map(Token::token_type).collect()
}

mod tokens {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    pub fn test_punctuation_and_operators() {
        assert_eq!(token_types("( ) { } [ ] , . : ; + - * / % = == < <= > >= ! != && ||"), vec![
            TokenType::ParenthesisLeft, TokenType::ParenthesisRight,
            TokenType::BracketLeft, TokenType::BracketRight,
            TokenType::SquareBracketLeft, TokenType::SquareBracketRight,
            TokenType::Comma, TokenType::Dot, TokenType::Colon, TokenType::Semicolon,
            TokenType::Plus, TokenType::Minus, TokenType::Multiply, TokenType::Divide, TokenType::Modulo,
            TokenType::Assign, TokenType::Equal,
            TokenType::Less, TokenType::LessEqual,
            TokenType::Greater, TokenType::GreaterEqual,
            TokenType::Not, TokenType::NotEqual,
            TokenType::And, TokenType::Or,
            TokenType::Eof,
        ]);
    }

    #[test]
    pub fn test_keywords_and_identifiers() {
        assert_eq!(token_types("let const fn if else elseif for switch case default break continue"), vec![
            TokenType::Let, TokenType::Const, TokenType::Fn,
            TokenType::If, TokenType::Else, TokenType::ElseIf,
            TokenType::For, TokenType::Switch, TokenType::Case, TokenType::Default,
            TokenType::Break, TokenType::Continue,
            TokenType::Eof,
        ]);

        // Keywords match exactly and case-sensitively
        assert_eq!(token_types("Let lets elsif iff"), vec![
            TokenType::Identifier, TokenType::Identifier, TokenType::Identifier, TokenType::Identifier,
            TokenType::Eof,
        ]);
    }

    #[test]
    pub fn test_positions() {
        let tokens = tokenize("let x = 42;").unwrap();

        let starts: Vec<usize> = tokens.iter().map(|token| token.start().offset).collect();
        assert_eq!(starts, vec![0, 4, 6, 8, 10, 11]);

        assert_eq!(tokens[3].source(), "42");
        assert_eq!(tokens[3].end().offset, 10);
    }

    #[test]
    pub fn test_eof_position_is_input_length() {
        let source = "x // trailing comment";
        let tokens = tokenize(source).unwrap();

        let eof = tokens.last().unwrap();
        assert_eq!(eof.token_type(), TokenType::Eof);
        assert_eq!(eof.start().offset, source.len());
    }

    #[test]
    pub fn test_digits_and_letters_split() {
        let tokens = tokenize("abc123").unwrap();

        assert_eq!(tokens[0].token_type(), TokenType::Identifier);
        assert_eq!(tokens[0].source(), "abc");
        assert_eq!(tokens[1].token_type(), TokenType::Number);
        assert_eq!(tokens[1].source(), "123");
    }
}

mod strings {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    pub fn test_string_literal() {
        let tokens = tokenize("\"hello world\"").unwrap();

        assert_eq!(tokens[0].token_type(), TokenType::String);
        assert_eq!(tokens[0].source(), "hello world");
        assert_eq!(tokens[0].start().offset, 0);
        assert_eq!(tokens[0].end().offset, 13);
    }

    #[test]
    pub fn test_doubled_quote_escape() {
        let tokens = tokenize("\"say \"\"hi\"\"\" x").unwrap();

        assert_eq!(tokens[0].source(), "say \"hi\"");
        assert_eq!(tokens[1].token_type(), TokenType::Identifier);
    }

    #[test]
    pub fn test_string_keeps_comment_markers() {
        let tokens = tokenize("\"a // b\"").unwrap();

        assert_eq!(tokens[0].source(), "a // b");
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    pub fn test_unterminated_string() {
        let error = tokenize("let s = \"abc").unwrap_err();

        assert_eq!(*error.kind(), ErrorKind::UnterminatedString);
        assert_eq!(error.trace(), &[TokenPos::new(8)]);
    }

    #[test]
    pub fn test_multibyte_content() {
        let tokens = tokenize("\"grüße\" ä").unwrap();

        assert_eq!(tokens[0].source(), "grüße");
        assert_eq!(tokens[1].token_type(), TokenType::Identifier);
        assert_eq!(tokens[1].source(), "ä");
        assert_eq!(tokens[1].start().offset, 10);
    }
}

mod comments {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    pub fn test_comment_elided() {
        assert_eq!(token_types("a // b c d\nb"), vec![
            TokenType::Identifier, TokenType::Identifier, TokenType::Eof,
        ]);
    }

    #[test]
    pub fn test_double_slash_is_never_division() {
        // `10 //2` is `10` followed by a comment
        assert_eq!(token_types("10 //2"), vec![TokenType::Number, TokenType::Eof]);
        assert_eq!(token_types("10 / 2"), vec![TokenType::Number, TokenType::Divide, TokenType::Number, TokenType::Eof]);
    }

    #[test]
    pub fn test_concatenation_reconstructs_content() {
        let source = "let x = (1 + 2) * foo; // comment\nfn f(a, b) { a % b }\n\tfor (x <= 3) { break; }";
        let tokens = tokenize(source).unwrap();

        let concatenated: String = tokens.iter()
            .filter(|token| token.token_type() != TokenType::Eof)
            .map(|token| token.source())
            .collect();

        let expected: String = source.lines()
            .map(|line| line.split("//").next().unwrap_or(""))
            .flat_map(|line| line.chars())
            .filter(|c| !c.is_whitespace())
            .collect();

        assert_eq!(concatenated, expected);
    }
}

mod errors {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    pub fn test_unexpected_character() {
        let error = tokenize("let x = 1 # 2").unwrap_err();

        assert_eq!(*error.kind(), ErrorKind::UnexpectedCharacter('#'));
        assert_eq!(error.trace(), &[TokenPos::new(10)]);
        assert_eq!(error.stage(), crate::interpreter::error::Stage::Lex);
    }

    #[test]
    pub fn test_single_ampersand_and_pipe() {
        let error = tokenize("a & b").unwrap_err();
        assert_eq!(*error.kind(), ErrorKind::IncompleteOperator('&'));
        assert_eq!(error.trace(), &[TokenPos::new(2)]);

        let error = tokenize("a | b").unwrap_err();
        assert_eq!(*error.kind(), ErrorKind::IncompleteOperator('|'));
    }

    #[test]
    pub fn test_underscore_is_not_an_identifier_character() {
        let error = tokenize("my_var").unwrap_err();

        assert_eq!(*error.kind(), ErrorKind::UnexpectedCharacter('_'));
    }
}

mod properties {
    use proptest::prelude::*;
    use super::*;

    fn arb_piece() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Zäöß]{1,8}",
            "[0-9]{1,6}",
            prop::sample::select(vec![
                "(", ")", "{", "}", "[", "]", ",", ".", ":", ";", "+", "-", "*", "/", "%",
                "=", "==", "<", "<=", ">", ">=", "!", "!=", "&&", "||",
            ]).prop_map(String::from),
        ]
    }

    fn arb_separator() -> impl Strategy<Value = String> {
        prop_oneof![
            "[ \t\n]{1,3}",
            "[a-z /]{0,10}".prop_map(|comment| format!(" //{}\n", comment)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn test_tokenize_never_panics(input in ".{0,100}") {
            let _ = tokenize(&input);
        }

        #[test]
        fn test_tokens_reconstruct_content(pieces in prop::collection::vec((arb_piece(), arb_separator()), 0..24)) {
            let source: String = pieces.iter()
                .map(|(piece, separator)| format!("{}{}", piece, separator))
                .collect();
            let expected: String = pieces.iter().map(|(piece, _)| piece.as_str()).collect();

            let tokens = tokenize(&source).map_err(|err| TestCaseError::fail(format!("{:?}: {}", source, err)))?;
            let concatenated: String = tokens.iter()
                .filter(|token| token.token_type() != TokenType::Eof)
                .map(Token::source)
                .collect();

            prop_assert_eq!(concatenated, expected);
        }
    }
}
