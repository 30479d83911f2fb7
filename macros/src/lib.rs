use proc_macro::Delimiter;
use proc_macro::Group;
use proc_macro::Ident;
use proc_macro::Literal;
use proc_macro::Punct;
use proc_macro::Spacing;
use proc_macro::Span;
use proc_macro::TokenStream;
use proc_macro::TokenTree;

/// Repeats the body of the annotated item `count` times.
///
/// `#[loop_unroll(j, start, count)]` or `#[loop_unroll(j, start, count, step)]`.
/// Every copy gets its own `let j: usize = start + k * step;` binding, so the
/// index is a constant the optimizer can fold into array accesses. Use `_`
/// as the index name when the body does not need it.
///
/// The annotated item is only a carrier for its braced body:
///
/// ```ignore
/// #[loop_unroll(j, 0, 16)]
/// fn loop_unroll() {
///     w[j] = load(j);
/// }
/// ```
#[proc_macro_attribute]
pub fn loop_unroll(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match parse_args(attr) {
        Ok(args) => args,
        Err(msg) => return compile_error(msg),
    };

    let body = match item.into_iter().find_map(|tt| match tt {
        TokenTree::Group(group) if group.delimiter() == Delimiter::Brace => Some(group),
        _ => None,
    }) {
        Some(body) => body,
        None => return compile_error("loop_unroll expects an item with a braced body"),
    };

    let mut output = TokenStream::new();
    for k in 0..args.count {
        let mut copy = TokenStream::new();
        if let Some(ident) = &args.index {
            let value = args.start + k * args.step;
            copy.extend([
                TokenTree::Ident(Ident::new("let", Span::call_site())),
                TokenTree::Ident(ident.clone()),
                TokenTree::Punct(Punct::new(':', Spacing::Alone)),
                TokenTree::Ident(Ident::new("usize", Span::call_site())),
                TokenTree::Punct(Punct::new('=', Spacing::Alone)),
                TokenTree::Literal(Literal::usize_unsuffixed(value)),
                TokenTree::Punct(Punct::new(';', Spacing::Alone)),
            ]);
        }
        copy.extend([TokenTree::Group(body.clone())]);
        output.extend([TokenTree::Group(Group::new(Delimiter::Brace, copy))]);
    }

    TokenStream::from(TokenTree::Group(Group::new(Delimiter::Brace, output)))
}

struct UnrollArgs {
    index: Option<Ident>,
    start: usize,
    count: usize,
    step: usize,
}

fn parse_args(attr: TokenStream) -> Result<UnrollArgs, &'static str> {
    let tokens: Vec<TokenTree> = attr
        .into_iter()
        .filter(|tt| !matches!(tt, TokenTree::Punct(p) if p.as_char() == ','))
        .collect();

    let index = match tokens.first() {
        Some(TokenTree::Ident(ident)) if ident.to_string() == "_" => None,
        Some(TokenTree::Ident(ident)) => Some(ident.clone()),
        _ => return Err("first argument must be an identifier or `_`"),
    };
    let start = parse_usize(tokens.get(1)).ok_or("second argument must be an integer literal")?;
    let count = parse_usize(tokens.get(2)).ok_or("third argument must be an integer literal")?;
    let step = match tokens.get(3) {
        Some(tt) => parse_usize(Some(tt)).ok_or("fourth argument must be an integer literal")?,
        None => 1,
    };
    if count == 0 {
        return Err("loop count must be non-zero");
    }

    Ok(UnrollArgs { index, start, count, step })
}

fn parse_usize(tt: Option<&TokenTree>) -> Option<usize> {
    match tt {
        Some(TokenTree::Literal(lit)) => {
            let text = lit.to_string();
            let digits = text.trim_end_matches(|c: char| !c.is_ascii_digit()).replace('_', "");
            digits.parse().ok()
        }
        _ => None,
    }
}

fn compile_error(msg: &str) -> TokenStream {
    format!("compile_error!({:?});", msg)
        .parse()
        .unwrap_or_default()
}
