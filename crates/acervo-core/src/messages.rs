// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User-facing messages for inline display.
//
// The product UI is Portuguese. A broken or unusual document degrades the
// preview or report with one of these strings; it never produces a raw
// error page. Converter variants map to a message too, although the
// conversion pipeline recovers them internally and callers normally never
// see them.

use crate::error::AcervoError;

/// Map an error to the plain Portuguese string shown inline in the UI.
pub fn user_message(err: &AcervoError) -> String {
    match err {
        AcervoError::NotFound(what) => {
            format!("Publicação não encontrada ({what}).")
        }
        AcervoError::UnsupportedFormat(ext) => format!(
            "Este tipo de arquivo ({ext}) não possui visualização. Baixe o arquivo para abri-lo."
        ),
        AcervoError::Corrupt(detail) => format!(
            "Não foi possível ler o conteúdo do arquivo enviado. ({detail})"
        ),
        AcervoError::ConverterUnavailable | AcervoError::ConverterFailed(_) => {
            "A conversão do documento não está disponível no momento.".into()
        }
        AcervoError::RenderFailed(detail) => format!(
            "Não foi possível gerar a visualização em PDF. ({detail})"
        ),
        AcervoError::Database(_) => "Erro ao consultar o acervo.".into(),
        AcervoError::Io(_) => "Erro ao acessar o arquivo da publicação.".into(),
        AcervoError::Serialization(_) => "Erro interno ao preparar a resposta.".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_names_the_extension() {
        let msg = user_message(&AcervoError::UnsupportedFormat("odt".into()));
        assert!(msg.contains("odt"));
    }

    #[test]
    fn converter_failures_share_one_message() {
        let a = user_message(&AcervoError::ConverterUnavailable);
        let b = user_message(&AcervoError::ConverterFailed("exit 1".into()));
        assert_eq!(a, b);
    }
}
