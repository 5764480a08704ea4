// Copyright (c) 2026 xmpp-pubsub-service contributors.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use core::fmt;
use std::collections::BTreeMap;

use minidom::Element;
use xmpp_parsers::stanza_error::{DefinedCondition, ErrorType, StanzaError};

use crate::feature::PubSubFeature;
use crate::ns;

/// A failure while handling a publish-subscribe request.
///
/// Backends return these from every operation.  The dispatcher folds a
/// failure into an IQ error: every variant except [`PubSubError::Internal`]
/// has a fixed wire representation, while unclassified failures become
/// `internal-server-error` and their detail only goes to the log.
#[derive(Debug, Clone, PartialEq)]
pub enum PubSubError {
    /// The request was missing a required attribute, or carried a
    /// malformed one.  Maps to `bad-request`.
    BadRequest,

    /// The service does not implement the requested operation.  Maps to
    /// `feature-not-implemented` with an `<unsupported/>` application
    /// condition naming the feature.
    Unsupported(PubSubFeature),

    /// Subscription options are not available on this service.
    OptionsUnavailable,

    /// A stanza error produced by the backend, forwarded verbatim.
    Stanza(StanzaError),

    /// Any other failure.  The reason is logged, never sent to the
    /// requester.
    Internal(String),
}

impl PubSubError {
    /// Wrap an arbitrary failure, to be reported as `internal-server-error`.
    pub fn internal<E: fmt::Display>(error: E) -> PubSubError {
        PubSubError::Internal(error.to_string())
    }

    /// The stanza error this failure is reported as.
    pub fn into_stanza_error(self) -> StanzaError {
        match self {
            PubSubError::BadRequest => {
                condition(ErrorType::Modify, DefinedCondition::BadRequest, None)
            }
            PubSubError::Unsupported(feature) => condition(
                ErrorType::Cancel,
                DefinedCondition::FeatureNotImplemented,
                Some(unsupported(feature.as_str())),
            ),
            PubSubError::OptionsUnavailable => condition(
                ErrorType::Cancel,
                DefinedCondition::FeatureNotImplemented,
                Some(unsupported(
                    PubSubFeature::SubscriptionOptionsUnavailable.as_str(),
                )),
            ),
            PubSubError::Stanza(error) => error,
            PubSubError::Internal(_) => condition(
                ErrorType::Wait,
                DefinedCondition::InternalServerError,
                None,
            ),
        }
    }
}

impl fmt::Display for PubSubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PubSubError::BadRequest => write!(f, "bad request"),
            PubSubError::Unsupported(feature) => write!(f, "unsupported feature: {}", feature),
            PubSubError::OptionsUnavailable => write!(f, "subscription options unavailable"),
            PubSubError::Stanza(error) => write!(f, "stanza error: {:?}", error.defined_condition),
            PubSubError::Internal(reason) => write!(f, "internal service error: {}", reason),
        }
    }
}

impl std::error::Error for PubSubError {}

impl From<StanzaError> for PubSubError {
    fn from(error: StanzaError) -> PubSubError {
        PubSubError::Stanza(error)
    }
}

fn condition(type_: ErrorType, condition: DefinedCondition, other: Option<Element>) -> StanzaError {
    StanzaError {
        type_,
        by: None,
        defined_condition: condition,
        texts: BTreeMap::new(),
        other,
        alternate_address: None,
    }
}

fn unsupported(feature: &str) -> Element {
    Element::builder("unsupported", ns::PUBSUB_ERRORS)
        .attr("feature", feature)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request() {
        let elem = Element::from(PubSubError::BadRequest.into_stanza_error());
        let expected: Element = "<error xmlns='jabber:component:accept' type='modify'><bad-request xmlns='urn:ietf:params:xml:ns:xmpp-stanzas'/></error>"
            .parse()
            .unwrap();
        assert_eq!(elem, expected);
    }

    #[test]
    fn unsupported_carries_feature() {
        let error = PubSubError::Unsupported(PubSubFeature::RetrieveItems);
        let elem = Element::from(error.into_stanza_error());
        let expected: Element = "<error xmlns='jabber:component:accept' type='cancel'><feature-not-implemented xmlns='urn:ietf:params:xml:ns:xmpp-stanzas'/><unsupported xmlns='http://jabber.org/protocol/pubsub#errors' feature='retrieve-items'/></error>"
            .parse()
            .unwrap();
        assert_eq!(elem, expected);
    }

    #[test]
    fn options_unavailable_is_a_feature_error() {
        let elem = Element::from(PubSubError::OptionsUnavailable.into_stanza_error());
        let expected: Element = "<error xmlns='jabber:component:accept' type='cancel'><feature-not-implemented xmlns='urn:ietf:params:xml:ns:xmpp-stanzas'/><unsupported xmlns='http://jabber.org/protocol/pubsub#errors' feature='subscription-options-unavailable'/></error>"
            .parse()
            .unwrap();
        assert_eq!(elem, expected);
    }

    #[test]
    fn internal_reason_stays_out_of_the_stanza() {
        let error = PubSubError::internal("database exploded");
        let elem = Element::from(error.into_stanza_error());
        let expected: Element = "<error xmlns='jabber:component:accept' type='wait'><internal-server-error xmlns='urn:ietf:params:xml:ns:xmpp-stanzas'/></error>"
            .parse()
            .unwrap();
        assert_eq!(elem, expected);
    }

    #[test]
    fn stanza_errors_are_forwarded_verbatim() {
        let inner = condition(ErrorType::Cancel, DefinedCondition::ItemNotFound, None);
        let error = PubSubError::from(inner.clone());
        assert_eq!(error.into_stanza_error(), inner);
    }
}
