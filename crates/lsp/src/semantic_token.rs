use crate::backend::text_range_to_range;
use ropey::Rope;
use sassafras::syntax_kind::SyntaxKind;
use sassafras::{SyntaxNode, SyntaxToken};
use tower_lsp::lsp_types::{SemanticToken, SemanticTokenType};

pub const LEGEND_TYPE: &[SemanticTokenType] = &[
    SemanticTokenType::STRING,
    SemanticTokenType::COMMENT,
    SemanticTokenType::NUMBER,
    SemanticTokenType::KEYWORD,
    SemanticTokenType::VARIABLE,
    SemanticTokenType::PROPERTY,
];

fn token_type(token: &SyntaxToken) -> Option<SemanticTokenType> {
    let parent = token.parent().map(|parent| parent.kind());
    let ty = match token.kind() {
        SyntaxKind::Comment | SyntaxKind::LineComment => SemanticTokenType::COMMENT,
        SyntaxKind::String | SyntaxKind::Url => SemanticTokenType::STRING,
        SyntaxKind::Number | SyntaxKind::Percentage | SyntaxKind::Dimension => SemanticTokenType::NUMBER,
        SyntaxKind::AtKeyword => SemanticTokenType::KEYWORD,
        _ => match parent {
            Some(SyntaxKind::ScssVariable | SyntaxKind::LessVariable) => SemanticTokenType::VARIABLE,
            Some(SyntaxKind::Property) if token.kind() == SyntaxKind::Ident => SemanticTokenType::PROPERTY,
            _ => return None,
        },
    };
    Some(ty)
}

pub fn get_semantic_tokens(root: &SyntaxNode, rope: &Rope) -> Vec<SemanticToken> {
    let mut prev_line = 0;
    let mut prev_start = 0;
    root.descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .flat_map(|token| {
            let semantic_token_type = token_type(&token)?;
            let range = text_range_to_range(token.text_range(), rope);
            let delta_line = range.start.line - prev_line;
            let delta_start = if delta_line == 0 { range.start.character - prev_start } else { range.start.character };
            prev_line = range.start.line;
            prev_start = range.start.character;
            Some(SemanticToken {
                delta_line,
                delta_start,
                length: token.text_range().len().into(),
                token_type: LEGEND_TYPE.iter().position(|ty| ty == &semantic_token_type)? as u32,
                token_modifiers_bitset: 0,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use ropey::Rope;
    use sassafras::Dialect;

    use super::get_semantic_tokens;

    #[test]
    fn scss_tokens() {
        let text = "$size: 10px;\na { width: $size; }";
        let rope = Rope::from_str(text);
        let parse = sassafras::parse(text, Dialect::Scss);
        let tokens = get_semantic_tokens(&parse.syntax_node(), &rope);
        let types: Vec<u32> = tokens.iter().map(|token| token.token_type).collect();
        // $ size 10px | width $ size
        assert_eq!(types, vec![4, 4, 2, 5, 4, 4]);
        assert_eq!(tokens[3].delta_line, 1);
        assert_eq!(tokens[3].delta_start, 4);
    }
}
