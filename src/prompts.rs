//! Prompt templates for the speaker advisor.

/// Inputs for a speaker-suggestion prompt.
#[derive(Debug, Clone)]
pub struct SuggestSpeakers<'a> {
    pub session_theme: &'a str,
    pub target_audience: &'a str,
    pub industry: &'a str,
    pub topics: &'a str,
    pub number_of_speakers: usize,
}

impl SuggestSpeakers<'_> {
    pub fn render(&self) -> String {
        format!(
            "You are a conference organizer AI.

Input Variables:
- {theme}
- {audience}
- {industry}
- {topics}
- {count}

Task: suggest speakers for this session

Output Format:
For each speaker:
  - Full Name
  - Title & Company
  - Expertise Areas (3-5)
  - Why Good Fit (2-3 sentences)
  - Notable Achievements
  - Suggested Topics (2-3)

Guidelines:
- Focus on real expertise
- Consider diversity
- Include thought leaders + emerging voices
",
            theme = self.session_theme,
            audience = self.target_audience,
            industry = self.industry,
            topics = self.topics,
            count = self.number_of_speakers,
        )
    }
}

/// Inputs for matching a speaker against session topics.
#[derive(Debug, Clone)]
pub struct MatchSpeakerToSessions<'a> {
    pub speaker_name: &'a str,
    pub speaker_expertise: &'a str,
    pub speaker_background: &'a str,
    pub previous_topics: &'a str,
    pub session_topics: &'a str,
    pub session_name: &'a str,
}

impl MatchSpeakerToSessions<'_> {
    pub fn render(&self) -> String {
        format!(
            "You are matching speakers to session topics.

Input Variables:
- {name}
- {expertise}
- {background}
- {previous}
- {topics}
- {session}

Task: find top 3 session matches

Output Format:
For each match:
  - Session Topic
  - Match Score (1-10)
  - Reasoning
  - Suggested Angle
  - Audience Value

Guidelines:
- Consider expertise depth
- Match audience level
- Look for unique perspectives
",
            name = self.speaker_name,
            expertise = self.speaker_expertise,
            background = self.speaker_background,
            previous = self.previous_topics,
            topics = self.session_topics,
            session = self.session_name,
        )
    }
}

/// Inputs for suggesting session topics to a speaker.
#[derive(Debug, Clone)]
pub struct SuggestSpeakerTopics<'a> {
    pub speaker_name: &'a str,
    pub speaker_expertise: &'a str,
    pub speaker_background: &'a str,
    pub recent_work: &'a str,
    pub session_name: &'a str,
    pub target_audience: &'a str,
    pub session_duration: u32,
    pub focus_areas: &'a str,
    pub number_of_topics: usize,
}

impl SuggestSpeakerTopics<'_> {
    pub fn render(&self) -> String {
        format!(
            "You are generating session topics for a speaker.

Input Variables:
- {name}
- {expertise}
- {background}
- {recent}
- {session}
- {audience}
- {duration}
- {focus}
- {count}

Task: Suggest session topics

Output Format:
For each topic:
  - Session Title (catchy, benefit-driven)
  - Session Type (keynote/workshop/panel/deep-dive)
  - Description (2-3 sentences)
  - Key Takeaways (3-4 bullets)
  - Target Level (beginner/intermediate/advanced)
  - Why this Speaker

Guidelines:
- Action-oriented titles
- Timely & relevant
- Mix practical + strategic
- Fit the time duration
",
            name = self.speaker_name,
            expertise = self.speaker_expertise,
            background = self.speaker_background,
            recent = self.recent_work,
            session = self.session_name,
            audience = self.target_audience,
            duration = self.session_duration,
            focus = self.focus_areas,
            count = self.number_of_topics,
        )
    }
}

/// Inputs for writing a speaker biography.
#[derive(Debug, Clone)]
pub struct GenerateSpeakerBio<'a> {
    pub speaker_name: &'a str,
    pub position: &'a str,
    pub company: &'a str,
    pub email: &'a str,
    pub current_bio: &'a str,
    pub session_titles: &'a str,
}

impl GenerateSpeakerBio<'_> {
    pub fn render(&self) -> String {
        format!(
            "You are writing a professional speaker biography.

Input Variables:
- {name}
- {position}
- {company}
- {email}
- {bio}
- {titles}

Task: Write a compelling 150-200 word professional biography

Output Format:
A single paragraph biography in third person

Guidelines:
- Write in third person (use the speaker's name or they/them)
- Lead with most impressive credential or current role
- Highlight 2-3 notable achievements or expertise areas
- Mention current position and company
- Reference their session topics if relevant
- Professional but engaging tone
- Focus on what makes them valuable to attendees
- Keep it concise (150-200 words)
- Avoid jargon unless industry-standard
- End with a note about what attendees will gain

Return only the biography text, no additional commentary.
",
            name = self.speaker_name,
            position = self.position,
            company = self.company,
            email = self.email,
            bio = self.current_bio,
            titles = self.session_titles,
        )
    }
}
