use crate::semantic_token::{get_semantic_tokens, LEGEND_TYPE};
use dashmap::DashMap;
use itertools::Itertools;
use ropey::Rope;
use sassafras::{Dialect, Parse};
use text_size::{TextRange, TextSize};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

pub struct Backend {
    client: Client,
    parse_map: DashMap<Url, Parse>,
    document_map: DashMap<Url, Rope>,
    semantic_token_map: DashMap<Url, Vec<SemanticToken>>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Backend {
            client,
            parse_map: DashMap::new(),
            document_map: DashMap::new(),
            semantic_token_map: DashMap::new(),
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                semantic_tokens_provider: Some(SemanticTokensServerCapabilities::SemanticTokensOptions(SemanticTokensOptions {
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                    legend: SemanticTokensLegend {
                        token_types: LEGEND_TYPE.into(),
                        token_modifiers: vec![],
                    },
                    range: None,
                    full: Some(SemanticTokensFullOptions::Bool(true)),
                })),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "sassafras-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client.log_message(MessageType::INFO, "server initialized!").await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.client.log_message(MessageType::INFO, "did_open").await;
        let dialect = dialect_of(&params.text_document.uri, &params.text_document.language_id);
        self.on_change(params.text_document.uri, &params.text_document.text, dialect).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        self.client.log_message(MessageType::INFO, format!("did_change {}", params.content_changes.len())).await;
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };
        let uri = params.text_document.uri;
        let dialect = self.parse_map.get(&uri).map(|parse| parse.dialect()).unwrap_or_else(|| dialect_of(&uri, ""));
        self.on_change(uri, &change.text, dialect).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.parse_map.remove(&uri);
        self.document_map.remove(&uri);
        self.semantic_token_map.remove(&uri);
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        let (Some(parse), Some(rope)) = (self.parse_map.get(&uri), self.document_map.get(&uri)) else {
            return Ok(None);
        };
        let Some(offset) = position_to_text_size(params.text_document_position_params.position, &rope) else {
            return Ok(None);
        };
        let Some(token) = parse.syntax_node().token_at_offset(offset).right_biased() else {
            return Ok(None);
        };
        let path = token
            .parent_ancestors()
            .map(|node| node.kind())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .map(|kind| format!("{kind:?}"))
            .chain(std::iter::once(format!("{:?}", token.kind())))
            .join(" > ");
        Ok(Some(Hover {
            contents: HoverContents::Scalar(MarkedString::String(path)),
            range: Some(text_range_to_range(token.text_range(), &rope)),
        }))
    }

    async fn semantic_tokens_full(&self, params: SemanticTokensParams) -> Result<Option<SemanticTokensResult>> {
        let Some(semantic_tokens) = self.semantic_token_map.get(&params.text_document.uri) else {
            return Ok(None);
        };
        Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
            result_id: None,
            data: semantic_tokens.clone(),
        })))
    }
}

impl Backend {
    async fn on_change(&self, uri: Url, text: &str, dialect: Dialect) {
        let rope = Rope::from_str(text);
        let (semantic_tokens, parse, diagnostics) = parse(text, dialect, &rope);
        self.parse_map.insert(uri.clone(), parse);
        self.document_map.insert(uri.clone(), rope);
        self.semantic_token_map.insert(uri.clone(), semantic_tokens);
        self.client.publish_diagnostics(uri, diagnostics, None).await
    }
}

fn dialect_of(uri: &Url, language_id: &str) -> Dialect {
    language_id
        .parse()
        .ok()
        .or_else(|| uri.path().rsplit_once('.').and_then(|(_, extension)| Dialect::from_extension(extension)))
        .unwrap_or(Dialect::Css)
}

fn parse(text: &str, dialect: Dialect, rope: &Rope) -> (Vec<SemanticToken>, Parse, Vec<Diagnostic>) {
    let parse = sassafras::parse(text, dialect);
    let semantic_tokens = get_semantic_tokens(&parse.syntax_node(), rope);
    let diagnostics = parse
        .errors()
        .iter()
        .map(|diag| Diagnostic {
            range: text_range_to_range(diag.range(), rope),
            severity: Some(DiagnosticSeverity::ERROR),
            source: Some("sassafras".to_string()),
            message: diag.message(),
            ..Default::default()
        })
        .collect();
    (semantic_tokens, parse, diagnostics)
}

pub fn text_range_to_range(text_range: TextRange, rope: &Rope) -> Range {
    Range::new(text_size_to_position(text_range.start(), rope), text_size_to_position(text_range.end(), rope))
}

pub fn text_size_to_position(text_size: TextSize, rope: &Rope) -> Position {
    let offset = text_size.into();
    let line = rope.byte_to_line(offset);
    let line_start = rope.line_to_byte(line);
    Position::new(line as u32, (offset - line_start) as u32)
}

fn position_to_text_size(position: Position, rope: &Rope) -> Option<TextSize> {
    let line = position.line as usize;
    if line >= rope.len_lines() {
        return None;
    }
    let offset = rope.line_to_byte(line) + position.character as usize;
    (offset <= rope.len_bytes()).then(|| TextSize::new(offset as u32))
}
