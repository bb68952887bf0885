use crate::error::Error;
use crate::events::MatrixPlacedEvent;
use crate::storage::Storage;
use crate::types::{MatrixSide, User};
use soroban_sdk::{Env, Symbol, Vec};

/// Binary placement matrix and sponsor-chain walks.
///
/// Users are stored by dense id, so both the matrix (parent/left/right) and the
/// sponsor chain are id references into the same table. Edges are written once
/// and never re-parented, which keeps both structures acyclic.
pub struct Matrix;

impl Matrix {
    /// Place `user` under the first node, breadth-first from the sponsor, that
    /// has an open slot. Left fills before right.
    ///
    /// Saves the parent; the caller saves `user`.
    pub fn place(env: &Env, user: &mut User, sponsor_id: u32) -> Result<u32, Error> {
        let mut queue: Vec<u32> = Vec::new(env);
        queue.push_back(sponsor_id);

        while let Some(id) = queue.pop_front() {
            let mut node = Storage::get_user(env, id)?;

            let side = match (node.left_child, node.right_child) {
                (None, _) => {
                    node.left_child = Some(user.id);
                    MatrixSide::Left
                }
                (Some(_), None) => {
                    node.right_child = Some(user.id);
                    MatrixSide::Right
                }
                (Some(left), Some(right)) => {
                    queue.push_back(left);
                    queue.push_back(right);
                    continue;
                }
            };

            Storage::set_user(env, &node);
            user.matrix_parent = Some(node.id);

            env.events().publish(
                (Symbol::new(env, "matrix_placed"), user.address.clone()),
                MatrixPlacedEvent {
                    user: user.address.clone(),
                    parent: node.address.clone(),
                    side,
                },
            );
            return Ok(node.id);
        }

        Err(Error::PlacementFailed)
    }

    /// Add `amount` to the leg volume of up to `depth` matrix ancestors
    pub fn add_volume(env: &Env, user: &User, amount: i128, depth: u32) -> Result<(), Error> {
        let mut child = user.id;
        let mut next = user.matrix_parent;
        let mut walked = 0;

        while let Some(parent_id) = next {
            if walked >= depth {
                break;
            }
            let mut parent = Storage::get_user(env, parent_id)?;

            if parent.left_child == Some(child) {
                parent.left_volume = parent
                    .left_volume
                    .checked_add(amount)
                    .ok_or(Error::MathOverflow)?;
            } else {
                parent.right_volume = parent
                    .right_volume
                    .checked_add(amount)
                    .ok_or(Error::MathOverflow)?;
            }
            Storage::set_user(env, &parent);

            child = parent.id;
            next = parent.matrix_parent;
            walked += 1;
        }

        Ok(())
    }

    /// Sponsor, sponsor's sponsor, ... up to `depth` entries
    pub fn sponsor_chain(env: &Env, user: &User, depth: u32) -> Result<Vec<User>, Error> {
        let mut chain = Vec::new(env);
        let mut next = user.sponsor;

        while let Some(id) = next {
            if chain.len() >= depth {
                break;
            }
            let ancestor = Storage::get_user(env, id)?;
            next = ancestor.sponsor;
            chain.push_back(ancestor);
        }

        Ok(chain)
    }

    /// Count a new registrant in the team of every sponsor-chain ancestor
    pub fn grow_team(env: &Env, user: &User, depth: u32) -> Result<(), Error> {
        let chain = Self::sponsor_chain(env, user, depth)?;
        for mut ancestor in chain.iter() {
            ancestor.team_size = ancestor
                .team_size
                .checked_add(1)
                .ok_or(Error::MathOverflow)?;
            Storage::set_user(env, &ancestor);
        }
        Ok(())
    }
}
