// Copyright (c) 2026 xmpp-pubsub-service contributors.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A publish-subscribe service dispatcher for XMPP components, as
//! specified in [XEP-0060](https://xmpp.org/extensions/xep-0060.html).
//!
//! This crate is the protocol half of a pub/sub service: it matches
//! inbound IQ stanzas against the XEP-0060 request grammar, decodes them
//! into typed requests, calls into a [`PubSubBackend`] that owns all node
//! state, and turns the outcome back into IQ results, IQ errors with the
//! proper pub/sub application conditions, and `<message/>` event
//! notifications.  Connection handling, service discovery plumbing and
//! storage all live elsewhere; the backend is an async trait whose
//! default methods refuse every operation, so a minimal service is just
//! an implementation of the calls it wants to support, hooked up with
//! [`PubSubServiceBuilder`].
//!
//! Stanzas are [`minidom::Element`]s, the same representation the
//! component stream of `tokio-xmpp` produces and consumes; responses and
//! notifications are handed to any `futures::Sink<Element>`.

#![warn(missing_docs)]

#[macro_use]
extern crate log;

pub use jid;
pub use minidom;
pub use xmpp_parsers as parsers;

/// The storage contract behind the service.
pub mod backend;
mod command;
mod disco;
/// The failure taxonomy and its mapping to stanza errors.
pub mod error;
/// The XEP-0060 feature vocabulary.
pub mod feature;
/// XML namespaces used on the wire.
pub mod ns;
mod request;
mod response;
/// The dispatcher itself.
pub mod service;

pub use backend::{NodeInfo, NodeOptions, NodeType, PubSubBackend, SubscriptionInfo};
pub use command::{Command, IqKind};
pub use error::PubSubError;
pub use feature::PubSubFeature;
pub use service::{PubSubService, PubSubServiceBuilder};
