// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::FunctionKey;

const EXCERPT_ELLIPSIS: &str = "...";

/// One documented function, as produced by the catalogue builder.
///
/// Records are immutable once loaded. `called_functions` holds the raw call expressions found
/// in the function body (`s.cartRepo.GetByID`, `cart.IsEmpty`, ...); they are free text and
/// only loosely related to dataset keys, see [`crate::query::links`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRecord {
    key: FunctionKey,
    function_name: String,
    receiver_type: Option<String>,
    package_name: String,
    file_name: String,
    doc_comment: Option<String>,
    called_functions: Vec<String>,
    diagram_description: String,
}

impl FunctionRecord {
    pub fn new(
        key: FunctionKey,
        function_name: impl Into<String>,
        package_name: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            key,
            function_name: function_name.into(),
            receiver_type: None,
            package_name: package_name.into(),
            file_name: file_name.into(),
            doc_comment: None,
            called_functions: Vec::new(),
            diagram_description: String::new(),
        }
    }

    pub fn with_receiver_type(mut self, receiver_type: Option<impl Into<String>>) -> Self {
        self.receiver_type = receiver_type.map(Into::into).filter(|value| !value.is_empty());
        self
    }

    pub fn with_doc_comment(mut self, doc_comment: Option<impl Into<String>>) -> Self {
        self.doc_comment = doc_comment.map(Into::into).filter(|value| !value.is_empty());
        self
    }

    pub fn with_called_functions<I, S>(mut self, called: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.called_functions = called.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_diagram_description(mut self, description: impl Into<String>) -> Self {
        self.diagram_description = description.into();
        self
    }

    pub fn key(&self) -> &FunctionKey {
        &self.key
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn receiver_type(&self) -> Option<&str> {
        self.receiver_type.as_deref()
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
    }

    pub fn called_functions(&self) -> &[String] {
        &self.called_functions
    }

    pub fn diagram_description(&self) -> &str {
        &self.diagram_description
    }

    /// `Receiver.Function` for methods, the bare function name otherwise.
    pub fn display_name(&self) -> String {
        match &self.receiver_type {
            Some(receiver) => format!("{receiver}.{}", self.function_name),
            None => self.function_name.clone(),
        }
    }

    /// The textual forms under which other records may reference this one: short name,
    /// receiver-qualified name (methods only) and the full key, in that order.
    pub fn candidate_patterns(&self) -> Vec<String> {
        let mut patterns = Vec::with_capacity(3);
        if !self.function_name.is_empty() {
            patterns.push(self.function_name.clone());
        }
        if let Some(receiver) = &self.receiver_type {
            patterns.push(format!("{receiver}.{}", self.function_name));
        }
        patterns.push(self.key.as_str().to_owned());
        patterns
    }

    /// Doc comment cut to `max_chars` characters, with `...` appended when cut.
    pub fn comment_excerpt(&self, max_chars: usize) -> Option<String> {
        let comment = self.doc_comment.as_deref()?;
        if comment.chars().count() <= max_chars {
            return Some(comment.to_owned());
        }
        let mut out: String = comment.chars().take(max_chars).collect();
        out.push_str(EXCERPT_ELLIPSIS);
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::FunctionRecord;
    use crate::model::FunctionKey;

    fn method() -> FunctionRecord {
        FunctionRecord::new(
            FunctionKey::new("service.CartService.GetCart").expect("key"),
            "GetCart",
            "service",
            "application/service/cart.go",
        )
        .with_receiver_type(Some("CartService"))
    }

    #[test]
    fn display_name_qualifies_methods_only() {
        assert_eq!(method().display_name(), "CartService.GetCart");

        let plain = FunctionRecord::new(
            FunctionKey::new("validator.ValidateOrder").expect("key"),
            "ValidateOrder",
            "validator",
            "application/validator/order.go",
        );
        assert_eq!(plain.display_name(), "ValidateOrder");
    }

    #[test]
    fn candidate_patterns_skip_missing_receiver() {
        assert_eq!(
            method().candidate_patterns(),
            vec!["GetCart", "CartService.GetCart", "service.CartService.GetCart"]
        );

        let plain = FunctionRecord::new(
            FunctionKey::new("validator.ValidateOrder").expect("key"),
            "ValidateOrder",
            "validator",
            "order.go",
        )
        .with_receiver_type(Some(""));
        assert_eq!(plain.receiver_type(), None);
        assert_eq!(plain.candidate_patterns(), vec!["ValidateOrder", "validator.ValidateOrder"]);
    }

    #[test]
    fn comment_excerpt_counts_chars_not_bytes() {
        let record = method().with_doc_comment(Some("GetCart カートIDでカートを取得"));
        assert_eq!(
            record.comment_excerpt(50).as_deref(),
            Some("GetCart カートIDでカートを取得")
        );
        assert_eq!(record.comment_excerpt(9).as_deref(), Some("GetCart カ..."));
        assert_eq!(method().comment_excerpt(50), None);
    }
}
