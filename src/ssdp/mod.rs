/*!
The protocol core: parsing, classification, response formatting, dispatch, and the
client-side query loop.

Submodules are ordered leaf-first, matching the component table in the crate's
top-level docs: [`header`] parses, [`desc`] interprets the compound `DESC` value,
[`classify`] turns a parsed request into an intent, [`response`] formats replies,
[`dispatch`] walks the tree, and [`query`] drives the client side.

None of these types hold onto an inbound packet buffer past the call that produced
them; [`classify::classify`] in particular follows the "post-handler" shape the
source uses — it reduces a borrowed buffer to a small owned [`classify::ClassifiedRequest`]
value before the dispatcher does any work, so the inbound buffer need not stay live
across dispatch.
*/

pub mod header;

pub mod desc;

pub mod classify;

pub mod response;

pub mod dispatch;

pub mod query;
