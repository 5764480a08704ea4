// Copyright (c) 2026 xmpp-pubsub-service contributors.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! XML namespaces used by the publish-subscribe service.

pub use xmpp_parsers::ns::{
    COMPONENT_ACCEPT, DATA_FORMS, DISCO_INFO, DISCO_ITEMS, PUBSUB, PUBSUB_CONFIGURE,
    PUBSUB_ERRORS, PUBSUB_EVENT, PUBSUB_OWNER,
};

/// XEP-0060: FORM_TYPE of the node meta-data form returned in disco#info.
pub const PUBSUB_METADATA: &str = "http://jabber.org/protocol/pubsub#meta-data";
