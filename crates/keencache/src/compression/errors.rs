#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Unexpected end of compressed input at byte {position}")]
    UnexpectedEndOfInput { position: usize },
    #[error("Huffman node {node} is outside the dictionary")]
    InvalidNode { node: usize },
    #[error("Back-reference to word {source_index} from output position {position} is out of range")]
    InvalidBackReference { position: usize, source_index: usize },
    #[error("Run of {count} words at output position {position} overruns {expected} expected words")]
    OutputOverrun {
        position: usize,
        count: usize,
        expected: usize,
    },
}
