//! Tokenizing command text and routing it to a family parser.

use tracing::debug;

use crate::error::{ParseError, ParseResult};

use super::{Command, aws, color, graphiql, graphql, web};

type FamilyParser = fn(&[&str], &str) -> ParseResult<Command>;

/// How many subcommand tokens a family needs before its parser is tried.
#[derive(Debug, Clone, Copy)]
enum Arity {
    AtLeastOne,
    Any,
}

impl Arity {
    const fn accepts(self, count: usize) -> bool {
        match self {
            Self::AtLeastOne => count >= 1,
            Self::Any => true,
        }
    }
}

struct Route {
    family: &'static str,
    arity: Arity,
    parse: FamilyParser,
}

const ROUTES: &[Route] = &[
    Route {
        family: "web",
        arity: Arity::AtLeastOne,
        parse: web::parse,
    },
    Route {
        family: "color",
        arity: Arity::AtLeastOne,
        parse: color::parse,
    },
    Route {
        family: "aws",
        arity: Arity::AtLeastOne,
        parse: aws::parse,
    },
    Route {
        family: "graphiql",
        arity: Arity::Any,
        parse: graphiql::parse,
    },
    Route {
        family: "graphql",
        arity: Arity::Any,
        parse: graphql::parse,
    },
];

/// Every top-level command token understood by the parser.
pub const FAMILIES: &[&str] = &["web", "color", "aws", "graphiql", "graphql"];

/// Parse command text into a [`Command`].
///
/// Leading `/` characters are dropped. The first line holds the
/// space-separated command path; everything after the first newline is the
/// parameter body, which goes through `preprocess` before the family parser
/// sees it. A failing `preprocess` aborts parsing with its error.
pub fn parse_command_input<F>(input: &str, preprocess: F) -> ParseResult<Command>
where
    F: FnOnce(&str) -> ParseResult<String>,
{
    let input = input.trim_start_matches('/');
    let (header, body) = input.split_once('\n').unwrap_or((input, ""));

    let params = preprocess(body)?;
    let tokens = tokenize(header);

    route(&tokens, &params)
}

/// [`parse_command_input`] with the parameter body used as-is.
pub fn parse_command(input: &str) -> ParseResult<Command> {
    parse_command_input(input, |body| Ok(body.to_string()))
}

/// Split the header line on spaces. Empty tokens from repeated spaces are dropped.
fn tokenize(header: &str) -> Vec<&str> {
    header
        .split(' ')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

fn route(tokens: &[&str], params: &str) -> ParseResult<Command> {
    let Some((family, subcommands)) = tokens.split_first() else {
        return Err(ParseError::NoCommand);
    };

    let route = ROUTES
        .iter()
        .find(|route| route.family == *family && route.arity.accepts(subcommands.len()))
        .ok_or_else(|| ParseError::UnknownCommand {
            path: tokens.iter().map(ToString::to_string).collect(),
        })?;

    debug!(family = route.family, subcommands = ?subcommands, "Routing command");
    (route.parse)(subcommands, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_trims_and_drops_empty_tokens() {
        assert_eq!(tokenize("aws  s3 object\r"), vec!["aws", "s3", "object"]);
        assert_eq!(tokenize("\t"), Vec::<&str>::new());
    }

    #[test]
    fn test_empty_input_is_no_command() {
        assert!(matches!(parse_command(""), Err(ParseError::NoCommand)));
        assert!(matches!(parse_command("///"), Err(ParseError::NoCommand)));
        assert!(matches!(parse_command("/\nurl = \"x\""), Err(ParseError::NoCommand)));
    }

    #[test]
    fn test_unknown_family() {
        let err = parse_command("/nonsense").unwrap_err();
        match err {
            ParseError::UnknownCommand { path } => assert_eq!(path, vec!["nonsense"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_family_without_required_subcommand_is_unknown() {
        for input in ["/web", "/color", "/aws\nbucket = \"b\""] {
            assert!(
                matches!(parse_command(input), Err(ParseError::UnknownCommand { .. })),
                "{input} should be unknown"
            );
        }
    }

    #[test]
    fn test_leading_slashes_are_optional() {
        assert!(matches!(parse_command("color #fff"), Ok(Command::Color(_))));
        assert!(matches!(parse_command("//color #fff"), Ok(Command::Color(_))));
    }

    #[test]
    fn test_gradient_body_follows_first_newline() {
        let cmd = parse_command("/color gradient\n#fff\n#000").unwrap();
        match cmd {
            Command::ColorGradient(gradient) => {
                assert_eq!(gradient.stops(), vec!["#ffffff", "#000000"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_graphiql_needs_no_subcommand() {
        let cmd = parse_command("/graphiql\nendpoint = \"https://api.example.com/graphql\"").unwrap();
        assert!(matches!(cmd, Command::GraphiqlMain(_)));
    }

    #[test]
    fn test_graphiql_rejects_subcommands() {
        let err = parse_command("/graphiql extra\nendpoint = \"https://x.example\"").unwrap_err();
        assert!(matches!(err, ParseError::UnknownSubcommand { family: "graphiql", .. }));
    }

    #[test]
    fn test_preprocess_sees_only_the_body() {
        let mut seen = String::new();
        let cmd = parse_command_input("/web meta\nurl = \"{{ site }}\"", |body| {
            seen = body.to_string();
            Ok(body.replace("{{ site }}", "https://example.com"))
        })
        .unwrap();

        assert_eq!(seen, "url = \"{{ site }}\"");
        match cmd {
            Command::WebMeta(meta) => assert_eq!(meta.url, "https://example.com"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_preprocess_error_aborts_parsing() {
        let err = parse_command_input("/color #fff", |_| {
            Err(ParseError::UnknownVariable {
                name: "token".to_string(),
            })
        })
        .unwrap_err();
        assert!(matches!(err, ParseError::UnknownVariable { .. }));
    }

    #[test]
    fn test_every_route_is_a_listed_family() {
        let routed: Vec<&str> = ROUTES.iter().map(|route| route.family).collect();
        assert_eq!(routed, FAMILIES);
    }
}
